// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tunables for loading and querying a store.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "affix_limit": 500, "fuzzy": { "min_ratio": 70.0 } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ngram::DEFAULT_NGRAM_SIZES;
use crate::stemmer::DEFAULT_MAX_LEVEL;

/// Store-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How many of the most frequent prefixes/suffixes to keep.
    pub affix_limit: usize,
    pub ngram_sizes: Vec<usize>,
    pub fuzzy: FuzzyQuery,
    /// Depth bound for recursive stem enumeration.
    pub max_level: usize,
    /// Shortest sub-word `calc_stem` will propose.
    pub min_subword_length: usize,
    pub ngram_thresholds: NGramThresholds,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            affix_limit: 2000,
            ngram_sizes: DEFAULT_NGRAM_SIZES.to_vec(),
            fuzzy: FuzzyQuery::default(),
            max_level: DEFAULT_MAX_LEVEL,
            min_subword_length: 3,
            ngram_thresholds: NGramThresholds::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), "loaded store config");
        Ok(config)
    }
}

/// Parameters of one tokenized fuzzy search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyQuery {
    /// Candidates scoring below this (0–100) are dropped.
    pub min_ratio: f64,
    /// Use only the last `n` tokens after sorting by id (the rarest ones).
    pub token_limit: Option<usize>,
    /// Score candidates once the intersection shrinks below this size.
    pub step_candidate_limit: usize,
}

impl Default for FuzzyQuery {
    fn default() -> Self {
        Self {
            min_ratio: 80.0,
            token_limit: None,
            step_candidate_limit: 100,
        }
    }
}

impl FuzzyQuery {
    pub fn with_min_ratio(mut self, min_ratio: f64) -> Self {
        self.min_ratio = min_ratio;
        self
    }

    pub fn with_token_limit(mut self, token_limit: Option<usize>) -> Self {
        self.token_limit = token_limit;
        self
    }

    pub fn with_step_candidate_limit(mut self, limit: usize) -> Self {
        self.step_candidate_limit = limit;
        self
    }
}

/// Rarity thresholds per n-gram size, for spell-check features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NGramThresholds(pub BTreeMap<usize, Vec<u64>>);

impl Default for NGramThresholds {
    fn default() -> Self {
        Self(BTreeMap::from([
            (2, vec![10, 100, 200, 500, 1000]),
            (3, vec![10, 50, 100, 200, 500]),
            (4, vec![10, 20, 30, 50, 100]),
        ]))
    }
}

impl NGramThresholds {
    /// `(n, threshold)` pairs in ascending order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0
            .iter()
            .flat_map(|(&n, thresholds)| thresholds.iter().map(move |&t| (n, t)))
    }
}
