// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Template-driven stemming and tokenized fuzzy lookup for agglutinative
//! vocabularies.
//!
//! A store is built offline from a word list and a set of stem templates
//! (`*хэри`: "any stem followed by хэри"), persisted as a small binary file,
//! and loaded into read-only structures that answer morphology queries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐
//! │  words.txt   │──▶│    build     │──▶│  StemmerData (triad) │──▶ .stemdex
//! │ groups.json  │   │ (regex rules,│   │ vocabulary, templates│
//! └──────────────┘   │   rayon)     │   │ word → template ids  │
//!                    └──────────────┘   └──────────┬───────────┘
//!                                                  │ load
//!                                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            StemmerStore                             │
//! │  trie rule (stems)   PatternAutomaton (prefix/suffix/wildcards)     │
//! │  TokenizedInvertedIndex (fuzzy)   AffixFrequencyMap (top-K affixes) │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown words are never errors: queries about them come back empty.
//!
//! # Usage
//!
//! ```ignore
//! use stemdex::{build_store, StemmerStore, StoreConfig, TemplateGroupSpec, UnigramTokenizer};
//!
//! let spec = TemplateGroupSpec::from_templates(["*хэри", "*ри"]);
//! let data = build_store(&["Iуащхьэ", "Iуащхьэхэри"], &spec)?;
//! let tokenizer = UnigramTokenizer::from_alphabet(data.vocabulary.keys())?;
//! let store = StemmerStore::load(data, tokenizer, StoreConfig::default())?;
//!
//! assert_eq!(store.find_possible_stems("Iуащхьэхэри", true), vec!["Iуащхьэ"]);
//! ```

pub mod binary;
pub mod build;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod ngram;
pub mod rules;
pub mod similarity;
pub mod stemmer;
pub mod store;
pub mod tokenize;
pub mod vocab;

#[doc(hidden)]
pub mod testing;

pub use build::{build_store, build_store_from_files, parse_word_list};
pub use config::{FuzzyQuery, NGramThresholds, StoreConfig};
pub use data::{StemmerData, WordTemplateAssociation};
pub use error::{Result, StemError};
pub use features::{Classifier, FeatureExtractor, FeatureVector, SpellCheckRow, SpellChecker};
pub use ngram::NGramFrequencyModel;
pub use rules::{
    RegexSuffixRule, StemRule, Template, TemplateGroup, TemplateGroupRegexRule,
    TemplateGroupSpec, TemplateGroupTrieRule,
};
pub use stemmer::{StemWalk, Stemmer};
pub use store::{FuzzyMatch, StemmerStore};
pub use tokenize::{Token, TokenId, Tokenizer, UnigramTokenizer};
pub use vocab::{
    MatchPolicy, PatternAutomaton, PatternTrie, TemplateId, TemplateIndex, VocabularyTrie, WordId,
};
