// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character n-gram frequencies across the vocabulary.
//!
//! OCR garbage tends to produce letter combinations the language never uses.
//! Counting every 2-, 3-, and 4-gram of every known word gives a cheap signal:
//! if most of a word's trigrams have been seen fewer than ten times in the
//! whole vocabulary, the word is probably not a word.
//!
//! One table per n, held in an explicit map keyed by n.

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// n-gram sizes used by the spell-check features.
pub const DEFAULT_NGRAM_SIZES: [usize; 3] = [2, 3, 4];

/// Read-only n-gram → count tables, one per configured n.
#[derive(Debug, Clone, Default)]
pub struct NGramFrequencyModel {
    tables: BTreeMap<usize, HashMap<String, u64>>,
}

/// Contiguous n-character windows of `word`. Empty when the word is shorter than `n`.
pub fn word_to_ngrams(word: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = word.chars().collect();
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

fn count_ngrams<'a, I>(words: I, n: usize) -> HashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = HashMap::new();
    for word in words {
        for gram in word_to_ngrams(word, n) {
            *table.entry(gram).or_insert(0) += 1;
        }
    }
    table
}

impl NGramFrequencyModel {
    /// Count n-grams for every size in `sizes` (duplicates and zero ignored).
    pub fn build<S: AsRef<str> + Sync>(words: &[S], sizes: &[usize]) -> Self {
        let mut tables = BTreeMap::new();
        for &n in sizes {
            if n == 0 || tables.contains_key(&n) {
                continue;
            }
            tables.insert(n, Self::build_table(words, n));
        }
        tracing::debug!(sizes = ?tables.keys().collect::<Vec<_>>(), words = words.len(), "built n-gram tables");
        Self { tables }
    }

    #[cfg(feature = "parallel")]
    fn build_table<S: AsRef<str> + Sync>(words: &[S], n: usize) -> HashMap<String, u64> {
        words
            .par_chunks(4096)
            .map(|chunk| count_ngrams(chunk.iter().map(AsRef::as_ref), n))
            .reduce(HashMap::new, |mut acc, part| {
                for (gram, count) in part {
                    *acc.entry(gram).or_insert(0) += count;
                }
                acc
            })
    }

    #[cfg(not(feature = "parallel"))]
    fn build_table<S: AsRef<str> + Sync>(words: &[S], n: usize) -> HashMap<String, u64> {
        count_ngrams(words.iter().map(AsRef::as_ref), n)
    }

    /// Sizes with a table, ascending.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.tables.keys().copied()
    }

    /// Corpus count of one n-gram; its size picks the table.
    ///
    /// A size without a table counts as never seen.
    pub fn frequency(&self, ngram: &str) -> u64 {
        let n = ngram.chars().count();
        self.tables
            .get(&n)
            .and_then(|table| table.get(ngram))
            .copied()
            .unwrap_or(0)
    }

    /// Distinct n-grams in the table for `n`.
    pub fn distinct(&self, n: usize) -> usize {
        self.tables.get(&n).map_or(0, HashMap::len)
    }

    /// Fraction of `word`'s n-grams whose corpus count is below `threshold`.
    ///
    /// A word shorter than `n` has no n-grams and scores 0.
    pub fn threshold_ratio(&self, word: &str, threshold: u64, n: usize) -> f64 {
        let grams = word_to_ngrams(word, n);
        if grams.is_empty() {
            return 0.0;
        }
        let table = self.tables.get(&n);
        let rare = grams
            .iter()
            .filter(|gram| table.and_then(|t| t.get(gram.as_str())).copied().unwrap_or(0) < threshold)
            .count();
        rare as f64 / grams.len() as f64
    }
}
