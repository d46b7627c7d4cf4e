// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The queryable store.
//!
//! # Architecture
//!
//! ```text
//!  persisted (.stemdex)              derived at load time
//! ┌──────────────────────┐        ┌─────────────────────────────┐
//! │ VocabularyTrie       │──────▶│ PatternAutomaton (fwd/rev)  │
//! │ TemplateIndex        │──────▶│ TemplateGroupTrieRule       │
//! │ WordTemplateAssoc.   │        │ TokenizedInvertedIndex      │
//! └──────────────────────┘──────▶│ prefix / suffix top-K maps  │
//!                                 └─────────────────────────────┘
//! ```
//!
//! Only the left column is ever written to disk. Everything on the right is
//! a pure function of it (plus the tokenizer), so a reloaded store answers
//! every query exactly like the one that was saved.
//!
//! Once loaded nothing mutates, so a store can sit behind an `Arc` and be
//! queried from any number of threads.

pub mod affix;
pub mod fuzzy;
pub mod inverted;

pub use affix::{AffixFrequencyMap, AffixKind};
pub use fuzzy::{search_in_tokenized_index, FuzzyMatch};
pub use inverted::TokenizedInvertedIndex;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::binary;
use crate::config::{FuzzyQuery, StoreConfig};
use crate::data::StemmerData;
use crate::error::Result;
use crate::rules::{TemplateGroup, TemplateGroupTrieRule};
use crate::stemmer::{most_common, StemWalk};
use crate::tokenize::Tokenizer;
use crate::vocab::{MatchPolicy, PatternAutomaton, WordId};

/// Loaded, read-only store.
pub struct StemmerStore<T: Tokenizer> {
    data: Arc<StemmerData>,
    config: StoreConfig,
    tokenizer: T,
    rule: TemplateGroupTrieRule,
    automaton: PatternAutomaton,
    inverted: TokenizedInvertedIndex,
    prefixes: AffixFrequencyMap,
    suffixes: AffixFrequencyMap,
}

impl<T: Tokenizer> StemmerStore<T> {
    /// Validate the persisted triad and derive everything else from it.
    ///
    /// Fails with `InvalidStoreData` when any component is empty or the
    /// association references a template that does not exist.
    pub fn load(data: StemmerData, tokenizer: T, config: StoreConfig) -> Result<Self> {
        data.validate()?;
        let start = Instant::now();
        let data = Arc::new(data);

        let rule = TemplateGroupTrieRule::new(Arc::clone(&data))?;
        let automaton = PatternAutomaton::build(&data.vocabulary);
        let inverted = TokenizedInvertedIndex::build(&data.vocabulary, &tokenizer);
        let prefixes = AffixFrequencyMap::prefixes(&data.vocabulary, config.affix_limit);
        let suffixes = AffixFrequencyMap::suffixes(&data.vocabulary, config.affix_limit);

        tracing::info!(
            words = data.vocabulary.len(),
            templates = data.templates.len(),
            tokens = inverted.len(),
            trie_nodes = automaton.forward().node_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded stemmer store"
        );

        Ok(Self {
            data,
            config,
            tokenizer,
            rule,
            automaton,
            inverted,
            prefixes,
            suffixes,
        })
    }

    /// Read a `.stemdex` file and load it.
    pub fn open(path: &Path, tokenizer: T, config: StoreConfig) -> Result<Self> {
        let data = binary::read_store(path)?;
        Self::load(data, tokenizer, config)
    }

    /// Persist the triad. Derived structures are rebuilt on the next load.
    pub fn save(&self, path: &Path) -> Result<()> {
        binary::write_store(&self.data, path)
    }

    pub fn data(&self) -> &StemmerData {
        &self.data
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn automaton(&self) -> &PatternAutomaton {
        &self.automaton
    }

    pub fn inverted_index(&self) -> &TokenizedInvertedIndex {
        &self.inverted
    }

    pub fn prefixes(&self) -> &AffixFrequencyMap {
        &self.prefixes
    }

    pub fn suffixes(&self) -> &AffixFrequencyMap {
        &self.suffixes
    }

    pub fn lookup(&self, word: &str) -> Option<WordId> {
        self.data.vocabulary.lookup(word)
    }

    pub fn word(&self, id: WordId) -> Option<&str> {
        self.data.vocabulary.key(id)
    }

    /// Templates recorded for `word`; empty for unknown words.
    pub fn get_templates(&self, word: &str) -> Vec<&str> {
        self.data.templates_of(word)
    }

    /// Stems from every template recorded for `word`.
    ///
    /// With `exist_only`, only stems that are vocabulary words themselves.
    pub fn find_possible_stems(&self, word: &str, exist_only: bool) -> Vec<String> {
        let stems = self.rule.find_possible_stems(word);
        if exist_only {
            stems
                .into_iter()
                .filter(|stem| self.data.vocabulary.contains(stem))
                .collect()
        } else {
            stems
        }
    }

    /// First-match stem through the recorded templates.
    pub fn stem(&self, word: &str) -> String {
        self.rule.apply(word).0
    }

    /// Stems of stems, bounded by `config.max_level`.
    ///
    /// Only vocabulary words have recorded templates, so the walk continues
    /// only through stems that are words themselves.
    pub fn find_possible_stems_recursive(&self, word: &str) -> StemWalk<'_> {
        StemWalk::new(word, self.config.max_level, |w| {
            self.rule.find_possible_stems(w)
        })
    }

    pub fn get_most_common_stems(&self, word: &str, limit: usize) -> Vec<(String, usize)> {
        most_common(
            self.find_possible_stems_recursive(word)
                .map(|(_, (_, stem))| stem),
            limit,
        )
    }

    /// Vocabulary words starting with `prefix`, in sorted order.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<(String, WordId)> {
        self.data
            .vocabulary
            .entries_with_prefix(prefix)
            .map(|(word, id)| (word.to_string(), id))
            .collect()
    }

    /// `prefix_len` arbitrary chars followed by `suffix`.
    ///
    /// `exact` ends the word right after `suffix`; otherwise anything may follow.
    pub fn find_by_suffix(
        &self,
        suffix: &str,
        prefix_len: usize,
        exact: bool,
    ) -> Vec<(String, WordId)> {
        let policy = if exact {
            MatchPolicy::ExactLength
        } else {
            MatchPolicy::AtLeastPrefix
        };
        self.automaton.find_by_suffix(suffix, prefix_len, policy)
    }

    /// Vocabulary words that are prefixes of `word`, shortest first.
    pub fn find_sub_words(&self, word: &str) -> Vec<(String, WordId)> {
        self.automaton.find_sub_words(word)
    }

    /// Fuzzy lookup with the configured defaults.
    pub fn search(&self, word: &str) -> Vec<FuzzyMatch> {
        self.search_in_tokenized_index(word, &self.config.fuzzy)
    }

    pub fn search_in_tokenized_index(&self, word: &str, query: &FuzzyQuery) -> Vec<FuzzyMatch> {
        search_in_tokenized_index(
            word,
            &self.tokenizer,
            &self.inverted,
            &self.data.vocabulary,
            query,
        )
    }

    /// Propose one sub-word stem for a possibly unknown `word`.
    ///
    /// Every possible stem is fuzzily matched against the vocabulary; every
    /// vocabulary prefix of every match is a vote, unless it is one of the
    /// frequent prefixes or shorter than `min_subword_length`. The sub-word
    /// with the most votes wins, with its vote count.
    pub fn calc_stem(&self, word: &str, min_subword_length: usize) -> Option<(String, usize)> {
        let mut votes = Vec::new();
        for stem in self.rule.find_possible_stems(word) {
            for candidate in self.search(&stem) {
                for (sub_word, _) in self.automaton.find_sub_words(&candidate.word) {
                    if !self.prefixes.contains(&sub_word)
                        && sub_word.chars().count() >= min_subword_length
                    {
                        votes.push(sub_word);
                    }
                }
            }
        }
        most_common(votes, 1).into_iter().next()
    }
}

impl<T: Tokenizer> std::fmt::Debug for StemmerStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemmerStore")
            .field("words", &self.data.vocabulary.len())
            .field("templates", &self.data.templates.len())
            .field("tokens", &self.inverted.len())
            .field("config", &self.config)
            .finish()
    }
}
