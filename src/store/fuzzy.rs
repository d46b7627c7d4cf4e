// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy lookup through the tokenized inverted index.
//!
//! Scoring every vocabulary word against a query is too slow for a few
//! hundred thousand words. Instead the query's sub-word tokens act as
//! filters: a word sharing all of them is a good candidate, and the
//! intersection of their posting lists is small.
//!
//! # Algorithm
//!
//! ```text
//! tokens  = encode(query), sorted by id ascending   (frequent → rare)
//! tokens  = last token_limit of them                (if limited)
//! set     = postings(tokens[0])
//! for each step:
//!     set = set ∩ postings(tokens[step])            (step > 0)
//!     if |set| < step_candidate_limit:
//!         score every word in set, keep those ≥ min_ratio
//! ```
//!
//! Low token ids are frequent pieces, so the intersection shrinks slowly at
//! first and sharply at the end, when the rare pieces arrive. Scoring after
//! every small-enough step means a query with one OCR-mangled token still
//! finds candidates from the steps before that token emptied the set.
//!
//! A candidate scored at one step is not rescored later. Its score only
//! depends on the query and the word, so the first score is the final one.

use std::collections::HashMap;

use super::inverted::{intersect_sorted, TokenizedInvertedIndex};
use crate::config::FuzzyQuery;
use crate::similarity::ratio;
use crate::tokenize::Tokenizer;
use crate::vocab::{VocabularyTrie, WordId};

/// One fuzzy search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub word: String,
    pub word_id: WordId,
    /// Similarity to the query, 0–100.
    pub score: f64,
}

/// Ranked candidates for `word`: descending score, ties by ascending word id.
pub fn search_in_tokenized_index<T: Tokenizer + ?Sized>(
    word: &str,
    tokenizer: &T,
    index: &TokenizedInvertedIndex,
    vocabulary: &VocabularyTrie,
    query: &FuzzyQuery,
) -> Vec<FuzzyMatch> {
    search_with_scorer(word, tokenizer, index, vocabulary, query, ratio)
}

/// The search loop with a pluggable similarity. `score` runs at most once
/// per candidate word.
pub(crate) fn search_with_scorer<T, F>(
    word: &str,
    tokenizer: &T,
    index: &TokenizedInvertedIndex,
    vocabulary: &VocabularyTrie,
    query: &FuzzyQuery,
    mut score: F,
) -> Vec<FuzzyMatch>
where
    T: Tokenizer + ?Sized,
    F: FnMut(&str, &str) -> f64,
{
    let mut tokens = tokenizer.encode(word);
    tokens.sort_by_key(|t| t.id);
    if let Some(limit) = query.token_limit.filter(|&l| l > 0) {
        let skip = tokens.len().saturating_sub(limit);
        tokens.drain(..skip);
    }

    let mut results: HashMap<WordId, f64> = HashMap::new();
    let mut candidates: Vec<WordId> = Vec::new();

    for (step, token) in tokens.iter().enumerate() {
        candidates = if step == 0 {
            index.postings(token.id).to_vec()
        } else {
            intersect_sorted(&candidates, index.postings(token.id))
        };

        tracing::debug!(
            step,
            token_id = token.id,
            token = %token.text,
            candidates = candidates.len(),
            "fuzzy step"
        );

        if candidates.len() < query.step_candidate_limit {
            for &id in &candidates {
                if results.contains_key(&id) {
                    continue;
                }
                let Some(candidate) = vocabulary.key(id) else {
                    continue;
                };
                let similarity = score(word, candidate);
                if similarity >= query.min_ratio {
                    results.insert(id, similarity);
                }
            }
        }

        // empty stays empty
        if candidates.is_empty() {
            break;
        }
    }

    let mut ranked: Vec<FuzzyMatch> = results
        .into_iter()
        .filter_map(|(word_id, score)| {
            vocabulary.key(word_id).map(|w| FuzzyMatch {
                word: w.to_string(),
                word_id,
                score,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.word_id.cmp(&b.word_id)));
    ranked
}
