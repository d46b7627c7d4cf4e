// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Multi-pattern matching over the vocabulary, forwards and backwards.
//!
//! Every vocabulary word is a pattern. A query is walked through the pattern
//! trie once, character by character, and the deepest terminal node seen on
//! the way is the longest vocabulary word that is a prefix of the query. That
//! is O(query length) regardless of vocabulary size, instead of testing
//! hundreds of thousands of words one at a time.
//!
//! Suffixes use the same trick on a second trie built from reversed words:
//! reverse the query, find its longest prefix there, reverse back.
//!
//! Wildcard queries (`???эфIэкIынут`) are a depth-first walk where a wildcard
//! position follows every child. Three length policies decide which terminal
//! nodes count as hits:
//!
//! ```text
//! pattern length L, key length K
//! ExactLength     K == L, every position matches
//! AtLeastPrefix   K >= L, first L positions match (whole subtree below)
//! AtMostPrefix    K <= L, key matches the first K pattern positions
//! ```
//!
//! All positions and lengths are in `char`s, never bytes.

use super::{VocabularyTrie, WordId};

/// How a wildcard pattern's length constrains matching keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    ExactLength,
    AtLeastPrefix,
    AtMostPrefix,
}

/// One position of a wildcard pattern. `None` matches any character.
pub type PatternChar = Option<char>;

#[derive(Debug, Clone, Default)]
struct Node {
    /// Sorted by char so traversal yields keys in sorted order.
    children: Vec<(char, u32)>,
    value: Option<u32>,
}

impl Node {
    fn child(&self, c: char) -> Option<u32> {
        self.children
            .binary_search_by(|(k, _)| k.cmp(&c))
            .ok()
            .map(|pos| self.children[pos].1)
    }
}

/// Character trie mapping keys to `u32` values.
///
/// Arena-allocated: nodes live in one `Vec` and refer to children by index.
#[derive(Debug, Clone)]
pub struct PatternTrie {
    nodes: Vec<Node>,
    len: usize,
}

impl Default for PatternTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }

    /// Build from `(key, value)` records. A repeated key keeps its last value.
    pub fn from_records<I, K>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: AsRef<str>,
    {
        let mut trie = Self::new();
        for (key, value) in records {
            trie.insert(key.as_ref().chars(), value);
        }
        trie
    }

    /// Insert a key given as characters.
    pub fn insert<I: IntoIterator<Item = char>>(&mut self, key: I, value: u32) {
        let mut node = 0usize;
        for c in key {
            node = match self.nodes[node].child(c) {
                Some(next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    let children = &mut self.nodes[node].children;
                    let pos = children.partition_point(|(k, _)| *k < c);
                    children.insert(pos, (c, next as u32));
                    next
                }
            };
        }
        if self.nodes[node].value.replace(value).is_none() {
            self.len += 1;
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        let mut node = 0usize;
        for c in key.chars() {
            node = self.nodes[node].child(c)? as usize;
        }
        self.nodes[node].value
    }

    /// Length in chars of the longest key that is a prefix of `query`.
    pub fn longest_prefix<I: IntoIterator<Item = char>>(&self, query: I) -> usize {
        let mut node = 0usize;
        let mut longest = 0;
        for (depth, c) in query.into_iter().enumerate() {
            match self.nodes[node].child(c) {
                Some(next) => node = next as usize,
                None => break,
            }
            if self.nodes[node].value.is_some() {
                longest = depth + 1;
            }
        }
        longest
    }

    /// Every key that is a prefix of `query`, as `(char length, value)`,
    /// shortest first.
    pub fn common_prefixes<'a>(
        &'a self,
        query: &'a [char],
    ) -> impl Iterator<Item = (usize, u32)> + 'a {
        let mut node = 0usize;
        query
            .iter()
            .enumerate()
            .map_while(move |(depth, &c)| {
                node = self.nodes[node].child(c)? as usize;
                Some((depth + 1, self.nodes[node].value))
            })
            .filter_map(|(len, value)| value.map(|v| (len, v)))
    }

    /// Keys matching a wildcard pattern under `policy`, in sorted key order.
    pub fn items(&self, pattern: &[PatternChar], policy: MatchPolicy) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        let mut key = String::new();
        self.walk(0, pattern, policy, &mut key, &mut out);
        out
    }

    fn walk(
        &self,
        node: usize,
        pattern: &[PatternChar],
        policy: MatchPolicy,
        key: &mut String,
        out: &mut Vec<(String, u32)>,
    ) {
        let here = &self.nodes[node];
        match pattern.split_first() {
            None => match policy {
                MatchPolicy::AtLeastPrefix => self.collect_subtree(node, key, out),
                MatchPolicy::ExactLength | MatchPolicy::AtMostPrefix => {
                    if let Some(value) = here.value {
                        out.push((key.clone(), value));
                    }
                }
            },
            Some((head, rest)) => {
                if policy == MatchPolicy::AtMostPrefix {
                    if let Some(value) = here.value {
                        out.push((key.clone(), value));
                    }
                }
                match head {
                    Some(c) => {
                        if let Some(next) = here.child(*c) {
                            key.push(*c);
                            self.walk(next as usize, rest, policy, key, out);
                            key.pop();
                        }
                    }
                    None => {
                        for &(c, next) in &here.children {
                            key.push(c);
                            self.walk(next as usize, rest, policy, key, out);
                            key.pop();
                        }
                    }
                }
            }
        }
    }

    fn collect_subtree(&self, node: usize, key: &mut String, out: &mut Vec<(String, u32)>) {
        let here = &self.nodes[node];
        if let Some(value) = here.value {
            out.push((key.clone(), value));
        }
        for &(c, next) in &here.children {
            key.push(c);
            self.collect_subtree(next as usize, key, out);
            key.pop();
        }
    }
}

/// Forward and reversed pattern tries over the same vocabulary.
///
/// Values are vocabulary word ids. Derived entirely from the vocabulary, so
/// rebuilding it after a reload gives the same answers.
#[derive(Debug, Clone, Default)]
pub struct PatternAutomaton {
    forward: PatternTrie,
    reversed: PatternTrie,
}

impl PatternAutomaton {
    pub fn build(vocabulary: &VocabularyTrie) -> Self {
        let mut forward = PatternTrie::new();
        let mut reversed = PatternTrie::new();
        for (word, id) in vocabulary.iter() {
            forward.insert(word.chars(), id);
            reversed.insert(word.chars().rev(), id);
        }
        Self { forward, reversed }
    }

    /// Chars of the longest vocabulary word that starts `query`.
    pub fn longest_prefix(&self, query: &str) -> usize {
        self.forward.longest_prefix(query.chars())
    }

    /// Chars of the longest vocabulary word that ends `query`.
    pub fn longest_suffix(&self, query: &str) -> usize {
        self.reversed.longest_prefix(query.chars().rev())
    }

    pub fn longest_prefix_str<'a>(&self, query: &'a str) -> &'a str {
        let chars = self.longest_prefix(query);
        let end = query.char_indices().nth(chars).map_or(query.len(), |(i, _)| i);
        &query[..end]
    }

    pub fn longest_suffix_str<'a>(&self, query: &'a str) -> &'a str {
        let chars = self.longest_suffix(query);
        let total = query.chars().count();
        let start = query
            .char_indices()
            .nth(total - chars)
            .map_or(query.len(), |(i, _)| i);
        &query[start..]
    }

    /// Words made of `prefix_len` arbitrary characters followed by `suffix`.
    ///
    /// With `ExactLength` the word must end right after `suffix`; with
    /// `AtLeastPrefix` anything may follow.
    pub fn find_by_suffix(
        &self,
        suffix: &str,
        prefix_len: usize,
        policy: MatchPolicy,
    ) -> Vec<(String, WordId)> {
        let pattern: Vec<PatternChar> = std::iter::repeat(None)
            .take(prefix_len)
            .chain(suffix.chars().map(Some))
            .collect();
        self.forward.items(&pattern, policy)
    }

    /// Every vocabulary word that is a prefix of `word`, shortest first.
    pub fn find_sub_words(&self, word: &str) -> Vec<(String, WordId)> {
        let pattern: Vec<PatternChar> = word.chars().map(Some).collect();
        self.forward.items(&pattern, MatchPolicy::AtMostPrefix)
    }

    pub fn forward(&self) -> &PatternTrie {
        &self.forward
    }
}
