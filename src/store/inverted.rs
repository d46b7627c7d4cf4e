// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token id → vocabulary words containing that token.
//!
//! # INVARIANTS
//!
//! 1. **POSTING_LIST_SORTED**: every posting list is strictly ascending by word id
//! 2. **NON_EMPTY**: every indexed token has at least one word
//! 3. **BUILD_COMPLETE**: word `w` is in the list of token `t` iff `t` occurs
//!    in the tokenization of `w`
//!
//! Sorted lists make intersection a linear merge, which is what fuzzy search
//! spends its time on.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::tokenize::{TokenId, Tokenizer};
use crate::vocab::{VocabularyTrie, WordId};

/// Read-only postings keyed by token id.
#[derive(Debug, Clone, Default)]
pub struct TokenizedInvertedIndex {
    postings: HashMap<TokenId, Vec<WordId>>,
}

impl TokenizedInvertedIndex {
    /// Tokenize every vocabulary word once and accumulate postings.
    ///
    /// Tokenization runs in parallel; the merge is single-threaded and walks
    /// words in id order, so lists come out sorted without a sort pass.
    pub fn build<T: Tokenizer + ?Sized>(vocabulary: &VocabularyTrie, tokenizer: &T) -> Self {
        // MAP PHASE: per-word distinct token ids
        let per_word = tokenize_all(vocabulary.keys(), tokenizer);

        // REDUCE PHASE
        let mut postings: HashMap<TokenId, Vec<WordId>> = HashMap::new();
        for (word_id, ids) in per_word.into_iter().enumerate() {
            for id in ids {
                postings.entry(id).or_default().push(word_id as WordId);
            }
        }

        Self { postings }
    }

    /// Words containing `token`; empty for tokens no word contains.
    pub fn postings(&self, token: TokenId) -> &[WordId] {
        self.postings.get(&token).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct tokens indexed.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Sum of all posting list lengths.
    pub fn posting_count(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }
}

fn distinct_ids<T: Tokenizer + ?Sized>(tokenizer: &T, word: &str) -> Vec<TokenId> {
    let mut ids = tokenizer.ids(word);
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(feature = "parallel")]
fn tokenize_all<T: Tokenizer + ?Sized>(words: &[String], tokenizer: &T) -> Vec<Vec<TokenId>> {
    words
        .par_iter()
        .map(|word| distinct_ids(tokenizer, word))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn tokenize_all<T: Tokenizer + ?Sized>(words: &[String], tokenizer: &T) -> Vec<Vec<TokenId>> {
    words.iter().map(|word| distinct_ids(tokenizer, word)).collect()
}

/// Merge-intersect two ascending lists.
pub fn intersect_sorted(a: &[WordId], b: &[WordId]) -> Vec<WordId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
