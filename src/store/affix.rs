// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Most frequent proper prefixes and suffixes of the vocabulary.
//!
//! "Proper" means shorter than the word: `рал` contributes `р`, `ра` as
//! prefixes and `л`, `ал` as suffixes, never `рал` itself. A sub-word that is
//! also one of the top prefixes is too common to say anything about a stem.

use std::collections::HashMap;

use crate::stemmer::most_common;
use crate::vocab::VocabularyTrie;

/// Which end of the word an [`AffixFrequencyMap`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// Top-K affixes by raw occurrence count.
#[derive(Debug, Clone)]
pub struct AffixFrequencyMap {
    kind: AffixKind,
    /// Descending by count; equal counts in first-seen order.
    ranked: Vec<(String, usize)>,
    counts: HashMap<String, usize>,
}

impl AffixFrequencyMap {
    pub fn build(vocabulary: &VocabularyTrie, kind: AffixKind, limit: usize) -> Self {
        let affixes = vocabulary.keys().iter().flat_map(|word| {
            let chars: Vec<char> = word.chars().collect();
            let len = chars.len();
            (1..len)
                .map(move |i| match kind {
                    AffixKind::Prefix => chars[..i].iter().collect::<String>(),
                    AffixKind::Suffix => chars[len - i..].iter().collect::<String>(),
                })
                .collect::<Vec<_>>()
        });
        let ranked = most_common(affixes, limit);
        let counts = ranked.iter().cloned().collect();
        Self {
            kind,
            ranked,
            counts,
        }
    }

    pub fn prefixes(vocabulary: &VocabularyTrie, limit: usize) -> Self {
        Self::build(vocabulary, AffixKind::Prefix, limit)
    }

    pub fn suffixes(vocabulary: &VocabularyTrie, limit: usize) -> Self {
        Self::build(vocabulary, AffixKind::Suffix, limit)
    }

    pub fn kind(&self) -> AffixKind {
        self.kind
    }

    pub fn contains(&self, affix: &str) -> bool {
        self.counts.contains_key(affix)
    }

    /// Count of a kept affix; `None` when it did not make the top-K.
    pub fn count(&self, affix: &str) -> Option<usize> {
        self.counts.get(affix).copied()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.ranked.iter().map(|(affix, count)| (affix.as_str(), *count))
    }
}
