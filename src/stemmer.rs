// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ordered rule list: first-match stemming and exhaustive stem enumeration.
//!
//! # Recursive enumeration
//!
//! Templates are not guaranteed to shorten a word, so blindly re-applying
//! them to their own output can loop forever. The walk is an explicit
//! worklist with two bounds:
//!
//! - a depth bound: a word found at level `max_level` is reported but never
//!   expanded further
//! - a global seen-set of `(word, stem)` pairs: a pair is reported once, and
//!   only a newly reported pair schedules its stem for expansion
//!
//! Each bound alone terminates the walk; together they also keep the output
//! free of repeats. Order is depth-first: all pairs of a word, then the
//! subtree of each of its stems in turn.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::rules::StemRule;

/// Recursion depth used when the caller does not pick one.
pub const DEFAULT_MAX_LEVEL: usize = 2;

/// An ordered list of rules.
///
/// Conventionally template groups come first, longest fixed part first.
#[derive(Debug, Clone, Default)]
pub struct Stemmer {
    rules: Vec<StemRule>,
}

impl Stemmer {
    pub fn new(rules: Vec<StemRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[StemRule] {
        &self.rules
    }

    /// First rule that applies wins. Unchanged word when none does.
    pub fn stem(&self, word: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| match rule.apply(word) {
                (stem, true) => Some(stem),
                (_, false) => None,
            })
            .unwrap_or_else(|| word.to_string())
    }

    /// Candidates from every rule, in rule order. May contain repeats.
    pub fn find_possible_stems(&self, word: &str) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.find_possible_stems(word))
            .collect()
    }

    pub fn find_suitable_templates(&self, word: &str) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.find_suitable_templates(word))
            .collect()
    }

    /// Lazily walk stems of stems, yielding `(level, (word, stem))`.
    pub fn find_possible_stems_recursive(&self, word: &str, max_level: usize) -> StemWalk<'_> {
        StemWalk::new(word, max_level, |w| self.find_possible_stems(w))
    }

    /// The `limit` stems seen most often across the recursive walk.
    ///
    /// Ties keep the order in which the stems were first encountered.
    pub fn get_most_common_stems(
        &self,
        word: &str,
        limit: usize,
        max_level: usize,
    ) -> Vec<(String, usize)> {
        most_common(
            self.find_possible_stems_recursive(word, max_level)
                .map(|(_, (_, stem))| stem),
            limit,
        )
    }
}

/// Count items and return the `limit` most frequent.
///
/// Equal counts keep first-encounter order.
pub(crate) fn most_common<I>(items: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        match counts.get_mut(&item) {
            Some(count) => *count += 1,
            None => {
                counts.insert(item.clone(), 1);
                order.push(item);
            }
        }
    }
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|item| {
            let count = counts.get(&item).copied().unwrap_or(0);
            (item, count)
        })
        .collect();
    // stable: ties stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

type Expand<'a> = Box<dyn Fn(&str) -> Vec<String> + 'a>;

/// Iterator returned by [`Stemmer::find_possible_stems_recursive`].
pub struct StemWalk<'a> {
    expand: Expand<'a>,
    max_level: usize,
    /// Words still to expand, top of stack last.
    stack: Vec<(usize, String)>,
    /// Pairs found for the current word, not yet yielded.
    pending: VecDeque<(usize, (String, String))>,
    seen: HashSet<(String, String)>,
}

impl<'a> StemWalk<'a> {
    /// Walk driven by any expansion function, not only a [`Stemmer`].
    pub fn new<F>(word: &str, max_level: usize, expand: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + 'a,
    {
        Self {
            expand: Box::new(expand),
            max_level,
            stack: vec![(0, word.to_string())],
            pending: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Number of distinct pairs yielded so far.
    pub fn seen_pairs(&self) -> usize {
        self.seen.len()
    }
}

impl Iterator for StemWalk<'_> {
    type Item = (usize, (String, String));

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            let (level, word) = self.stack.pop()?;

            let mut children = Vec::new();
            for stem in (self.expand)(&word) {
                let pair = (word.clone(), stem);
                if self.seen.contains(&pair) {
                    continue;
                }
                self.seen.insert(pair.clone());
                if level < self.max_level {
                    children.push(pair.1.clone());
                }
                self.pending.push_back((level, pair));
            }
            // reversed so the first stem is expanded first
            self.stack
                .extend(children.into_iter().rev().map(|stem| (level + 1, stem)));
        }
    }
}

impl std::fmt::Debug for StemWalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemWalk")
            .field("max_level", &self.max_level)
            .field("stack", &self.stack)
            .field("seen", &self.seen.len())
            .finish()
    }
}
