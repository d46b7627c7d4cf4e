// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Plain regex suffix rules.
//!
//! A rule is a suffix pattern such as `"ри$"` plus guards: a minimum length
//! for what is left after stripping, extra conditions on the whole word, and
//! a list of words the rule must never touch (`ахэри` looks plural but is not).

use regex::Regex;

use crate::error::{Result, StemError};

/// Minimum stem length left by a suffix rule unless configured otherwise.
pub const DEFAULT_MIN_STEM_LENGTH: usize = 2;

/// Extra guard evaluated against the whole word before stripping.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Word has at least this many characters.
    MinLength(usize),
    StartsWith(String),
    EndsWith(String),
    /// Word matches the regex at its start.
    Matches(Regex),
}

impl Condition {
    pub fn matches(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{})", pattern);
        Regex::new(&anchored)
            .map(Condition::Matches)
            .map_err(|e| StemError::rule(pattern, e))
    }

    pub fn holds(&self, word: &str) -> bool {
        match self {
            Condition::MinLength(n) => word.chars().count() >= *n,
            Condition::StartsWith(s) => word.starts_with(s.as_str()),
            Condition::EndsWith(s) => word.ends_with(s.as_str()),
            Condition::Matches(re) => re.is_match(word),
        }
    }
}

/// Strip a regex-matched suffix when the guards allow it.
#[derive(Debug, Clone)]
pub struct RegexSuffixRule {
    pattern: String,
    regex: Regex,
    pattern_length: usize,
    min_stem_length: usize,
    conditions: Vec<Condition>,
    excluded_words: Vec<String>,
}

impl RegexSuffixRule {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| StemError::rule(pattern, e))?;
        let pattern_length = pattern.chars().filter(|c| *c != '$' && *c != '^').count();
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            pattern_length,
            min_stem_length: DEFAULT_MIN_STEM_LENGTH,
            conditions: Vec::new(),
            excluded_words: Vec::new(),
        })
    }

    pub fn with_min_stem_length(mut self, min: usize) -> Self {
        self.min_stem_length = min;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_excluded<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `len(word) - len(pattern without anchors) >= min_stem_length`.
    pub fn is_valid_stem_length(&self, word: &str) -> bool {
        word.chars()
            .count()
            .checked_sub(self.pattern_length)
            .is_some_and(|stem| stem >= self.min_stem_length)
    }

    pub fn is_excluded(&self, word: &str) -> bool {
        self.excluded_words.iter().any(|w| w == word)
    }

    pub fn is_applicable(&self, word: &str) -> bool {
        self.is_valid_stem_length(word)
            && !self.is_excluded(word)
            && self.conditions.iter().all(|c| c.holds(word))
    }

    /// Strip the suffix. Reports `false` when a guard fails or the pattern
    /// does not occur in the word.
    pub fn apply(&self, word: &str) -> (String, bool) {
        if self.is_applicable(word) && self.regex.is_match(word) {
            (self.regex.replace_all(word, "").into_owned(), true)
        } else {
            (word.to_string(), false)
        }
    }
}

/// Plural/definite suffix rules, most specific first.
pub fn default_suffix_rules() -> Result<Vec<RegexSuffixRule>> {
    Ok(vec![
        RegexSuffixRule::new("хэри$")?.with_condition(Condition::MinLength(6)),
        RegexSuffixRule::new("ри$")?
            .with_condition(Condition::MinLength(4))
            .with_excluded(["ахэри"]),
        RegexSuffixRule::new("и$")?.with_condition(Condition::MinLength(3)),
    ])
}
