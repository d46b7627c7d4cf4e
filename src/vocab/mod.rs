// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sorted key indexes: the word ↔ id mapping and the template ↔ id mapping.
//!
//! Both are the same structure. A sorted, de-duplicated `Vec<String>` where the
//! position of a key *is* its id. Sorting gives us three things for free:
//! dense ids, exact lookup by binary search, and prefix enumeration as a
//! contiguous slice (every key starting with `p` sits between the first key
//! `>= p` and the first key that stops starting with `p`).
//!
//! | Operation          | Complexity          |
//! |--------------------|---------------------|
//! | `lookup`           | O(len · log n)      |
//! | `key`              | O(1)                |
//! | `keys_with_prefix` | O(len · log n + k)  |
//!
//! The multi-pattern automata used for longest-prefix and wildcard queries are
//! derived from this in [`automaton`].

pub mod automaton;

pub use automaton::{MatchPolicy, PatternAutomaton, PatternTrie};

use crate::error::{Result, StemError};

/// Dense id of a vocabulary word (its position in sorted order).
pub type WordId = u32;

/// Dense id of a stemming template.
pub type TemplateId = u32;

/// Immutable sorted key set with dense ids.
///
/// Ordering is Rust's `str` ordering (UTF-8 bytes, which equals code point
/// order), so ids are identical across processes and platforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyTrie {
    keys: Vec<String>,
}

impl VocabularyTrie {
    /// Build from any collection of words. Duplicates collapse to one id.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = words.into_iter().map(Into::into).collect();
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    /// Adopt a key list that must already be strictly sorted.
    ///
    /// Used when decoding a persisted store: a repeated key means two ids
    /// were issued for the same word, an out-of-order key means the ids no
    /// longer match positions.
    pub fn from_sorted(keys: Vec<String>) -> Result<Self> {
        for pair in keys.windows(2) {
            match pair[0].cmp(&pair[1]) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => return Err(StemError::DuplicateWord(pair[1].clone())),
                std::cmp::Ordering::Greater => {
                    return Err(StemError::InvalidStoreData(format!(
                        "keys not sorted: '{}' before '{}'",
                        pair[0], pair[1]
                    )))
                }
            }
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact match.
    pub fn lookup(&self, word: &str) -> Option<WordId> {
        self.keys
            .binary_search_by(|key| key.as_str().cmp(word))
            .ok()
            .map(|pos| pos as WordId)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Reverse mapping. `None` for ids past the end.
    pub fn key(&self, id: WordId) -> Option<&str> {
        self.keys.get(id as usize).map(String::as_str)
    }

    /// All keys starting with `prefix`, in sorted order.
    ///
    /// The returned iterator is `Clone`, so callers can restart it without
    /// repeating the binary search.
    pub fn keys_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a str> + Clone + 'a {
        let start = self.keys.partition_point(|key| key.as_str() < prefix);
        self.keys[start..]
            .iter()
            .take_while(move |key| key.starts_with(prefix))
            .map(String::as_str)
    }

    /// Like [`keys_with_prefix`](Self::keys_with_prefix), with ids.
    pub fn entries_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, WordId)> + 'a {
        let start = self.keys.partition_point(|key| key.as_str() < prefix);
        self.keys[start..]
            .iter()
            .zip(start..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, id)| (key.as_str(), id as WordId))
    }

    /// `(key, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, WordId)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(id, key)| (key.as_str(), id as WordId))
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Template string ↔ template id.
///
/// Same sorted-key layout as the vocabulary. Kept as its own type so a word id
/// can never be passed where a template id is expected by accident of naming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateIndex {
    trie: VocabularyTrie,
}

impl TemplateIndex {
    pub fn build<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trie: VocabularyTrie::build(templates),
        }
    }

    pub fn from_sorted(templates: Vec<String>) -> Result<Self> {
        Ok(Self {
            trie: VocabularyTrie::from_sorted(templates)?,
        })
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn id(&self, template: &str) -> Option<TemplateId> {
        self.trie.lookup(template)
    }

    pub fn template(&self, id: TemplateId) -> Option<&str> {
        self.trie.key(id)
    }

    pub fn templates(&self) -> &[String] {
        self.trie.keys()
    }
}
