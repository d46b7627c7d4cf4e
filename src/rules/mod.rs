// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Stemming rules.
//!
//! Every rule answers the same four questions about a word:
//!
//! ```text
//! apply                    -> (stem, applied?)   first transformation that fits
//! is_applicable            -> bool               would apply() do anything?
//! find_possible_stems      -> [stem]             every transformation that fits
//! find_suitable_templates  -> [template]         which templates fit (template rules only)
//! ```
//!
//! The set of rule kinds is closed, so they live in one enum and dispatch
//! with a `match` instead of a trait object.

pub mod suffix;
pub mod template;

pub use suffix::{default_suffix_rules, Condition, RegexSuffixRule, DEFAULT_MIN_STEM_LENGTH};
pub use template::{
    Template, TemplateGroup, TemplateGroupEntry, TemplateGroupRegexRule, TemplateGroupSpec,
    TemplateGroupTrieRule, DEFAULT_TEMPLATE_MIN_LENGTH, WILDCARD,
};

/// One rule in a [`Stemmer`](crate::Stemmer)'s ordered list.
#[derive(Debug, Clone)]
pub enum StemRule {
    RegexSuffix(RegexSuffixRule),
    TemplateGroupRegex(TemplateGroupRegexRule),
    TemplateGroupTrie(TemplateGroupTrieRule),
}

impl StemRule {
    pub fn apply(&self, word: &str) -> (String, bool) {
        match self {
            StemRule::RegexSuffix(rule) => rule.apply(word),
            StemRule::TemplateGroupRegex(rule) => rule.apply(word),
            StemRule::TemplateGroupTrie(rule) => rule.apply(word),
        }
    }

    pub fn is_applicable(&self, word: &str) -> bool {
        match self {
            StemRule::RegexSuffix(rule) => rule.is_applicable(word),
            StemRule::TemplateGroupRegex(rule) => rule.is_applicable(word),
            StemRule::TemplateGroupTrie(rule) => rule.is_applicable(word),
        }
    }

    /// A suffix rule has at most one stem: the one `apply` produces.
    pub fn find_possible_stems(&self, word: &str) -> Vec<String> {
        match self {
            StemRule::RegexSuffix(rule) => match rule.apply(word) {
                (stem, true) => vec![stem],
                (_, false) => Vec::new(),
            },
            StemRule::TemplateGroupRegex(rule) => rule.find_possible_stems(word),
            StemRule::TemplateGroupTrie(rule) => rule.find_possible_stems(word),
        }
    }

    pub fn find_suitable_templates(&self, word: &str) -> Vec<String> {
        match self {
            StemRule::RegexSuffix(_) => Vec::new(),
            StemRule::TemplateGroupRegex(rule) => rule.find_suitable_templates(word),
            StemRule::TemplateGroupTrie(rule) => rule.find_suitable_templates(word),
        }
    }
}

impl From<RegexSuffixRule> for StemRule {
    fn from(rule: RegexSuffixRule) -> Self {
        StemRule::RegexSuffix(rule)
    }
}

impl From<TemplateGroupRegexRule> for StemRule {
    fn from(rule: TemplateGroupRegexRule) -> Self {
        StemRule::TemplateGroupRegex(rule)
    }
}

impl From<TemplateGroupTrieRule> for StemRule {
    fn from(rule: TemplateGroupTrieRule) -> Self {
        StemRule::TemplateGroupTrie(rule)
    }
}
