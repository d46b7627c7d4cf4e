// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Spell-check features for a single word.
//!
//! A misspelled or OCR-damaged word tends to look wrong in several cheap,
//! independent ways at once:
//!
//! ```text
//! tokenizers   many short tokens, odd first/last piece
//! n-grams      a large share of its n-grams are rare in the corpus
//! vocabulary   no long known word starts or ends it
//! ```
//!
//! [`FeatureExtractor`] measures all of these into a [`FeatureVector`] with
//! stable names and order. What to do with the numbers is a [`Classifier`]'s
//! business; [`SpellChecker`] just runs the two over a batch of words.
//!
//! Ratios with a zero denominator (empty word, no tokens) are 0.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{NGramThresholds, StoreConfig};
use crate::ngram::NGramFrequencyModel;
use crate::tokenize::{has_consecutive_single_char_tokens, Tokenizer};
use crate::vocab::{PatternAutomaton, VocabularyTrie};

/// Named features in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Values only, in the same order as [`names`](Self::names).
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, v)| v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Vocabulary automaton, n-gram tables, and tokenizers bundled for extraction.
pub struct FeatureExtractor {
    automaton: PatternAutomaton,
    ngrams: NGramFrequencyModel,
    thresholds: NGramThresholds,
    tokenizers: Vec<(String, Box<dyn Tokenizer>)>,
}

impl FeatureExtractor {
    pub fn new(
        automaton: PatternAutomaton,
        ngrams: NGramFrequencyModel,
        thresholds: NGramThresholds,
    ) -> Self {
        Self {
            automaton,
            ngrams,
            thresholds,
            tokenizers: Vec::new(),
        }
    }

    /// Automaton and n-gram tables over `vocabulary`, sizes and thresholds
    /// from `config`.
    pub fn from_vocabulary(vocabulary: &VocabularyTrie, config: &StoreConfig) -> Self {
        let automaton = PatternAutomaton::build(vocabulary);
        let ngrams = NGramFrequencyModel::build(vocabulary.keys(), &config.ngram_sizes);
        for (n, _) in config.ngram_thresholds.pairs() {
            if !ngrams.sizes().any(|size| size == n) {
                tracing::warn!(n, "threshold configured for an n-gram size with no table");
            }
        }
        Self::new(automaton, ngrams, config.ngram_thresholds.clone())
    }

    /// Register a tokenizer; its features are prefixed with `name`.
    pub fn with_tokenizer(mut self, name: impl Into<String>, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizers.push((name.into(), Box::new(tokenizer)));
        self
    }

    pub fn tokenizer_names(&self) -> impl Iterator<Item = &str> {
        self.tokenizers.iter().map(|(n, _)| n.as_str())
    }

    pub fn extract(&self, word: &str) -> FeatureVector {
        let word_len = word.chars().count();
        let mut features = FeatureVector::default();
        features.push("word_len", word_len as f64);

        for (name, tokenizer) in &self.tokenizers {
            let tokens = tokenizer.encode(word);
            let first = tokens.first();
            let last = tokens.last();
            features.push(
                format!("{name}_char_count/token_count"),
                ratio(word_len, tokens.len()),
            );
            features.push(format!("{name}_tokens_count"), tokens.len() as f64);
            features.push(
                format!("{name}_prefix_len"),
                first.map_or(0.0, |t| t.char_len() as f64),
            );
            features.push(
                format!("{name}_prefix_id"),
                first.map_or(0.0, |t| f64::from(t.id)),
            );
            features.push(
                format!("{name}_suffix_len"),
                last.map_or(0.0, |t| t.char_len() as f64),
            );
            features.push(
                format!("{name}_suffix_id"),
                last.map_or(0.0, |t| f64::from(t.id)),
            );
            features.push(
                format!("{name}_one_char_tokens_consecutive"),
                if has_consecutive_single_char_tokens(&tokens) { 1.0 } else { 0.0 },
            );
        }

        for (n, threshold) in self.thresholds.pairs() {
            features.push(
                format!("{n}gram_threshold_{threshold}"),
                self.ngrams.threshold_ratio(word, threshold, n),
            );
        }

        let prefix = self.automaton.longest_prefix(word);
        let suffix = self.automaton.longest_suffix(word);
        features.push("longest_prefix_len", prefix as f64);
        features.push("longest_prefix/word_len", ratio(prefix, word_len));
        features.push("longest_suffix_len", suffix as f64);
        features.push("longest_suffix/word_len", ratio(suffix, word_len));

        features
    }
}

impl std::fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("tokenizers", &self.tokenizer_names().collect::<Vec<_>>())
            .field("ngram_sizes", &self.ngrams.sizes().collect::<Vec<_>>())
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

/// Turns a feature vector into a verdict. Training happens elsewhere.
pub trait Classifier: Sync {
    type Label: Send;

    fn predict(&self, features: &FeatureVector) -> Self::Label;
}

impl<F, L> Classifier for F
where
    F: Fn(&FeatureVector) -> L + Sync,
    L: Send,
{
    type Label = L;

    fn predict(&self, features: &FeatureVector) -> L {
        self(features)
    }
}

/// One checked word.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCheckRow<L> {
    pub word: String,
    pub label: L,
    /// Occurrences of the word in the checked batch.
    pub frequency: usize,
}

/// Feature extraction plus a classifier, over batches of words.
#[derive(Debug)]
pub struct SpellChecker<C> {
    extractor: FeatureExtractor,
    classifier: C,
}

impl<C: Classifier> SpellChecker<C> {
    pub fn new(extractor: FeatureExtractor, classifier: C) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn check_word(&self, word: &str) -> C::Label {
        self.classifier.predict(&self.extractor.extract(word))
    }

    /// Classify each distinct word once, in first-seen order.
    pub fn check<S: AsRef<str>>(&self, words: &[S]) -> Vec<SpellCheckRow<C::Label>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut unique: Vec<&str> = Vec::new();
        for word in words {
            let word = word.as_ref();
            let count = counts.entry(word).or_insert(0);
            if *count == 0 {
                unique.push(word);
            }
            *count += 1;
        }

        #[cfg(feature = "parallel")]
        let labels: Vec<C::Label> = unique.par_iter().map(|w| self.check_word(w)).collect();
        #[cfg(not(feature = "parallel"))]
        let labels: Vec<C::Label> = unique.iter().map(|w| self.check_word(w)).collect();

        unique
            .into_iter()
            .zip(labels)
            .map(|(word, label)| SpellCheckRow {
                word: word.to_string(),
                label,
                frequency: counts.get(word).copied().unwrap_or(0),
            })
            .collect()
    }
}
