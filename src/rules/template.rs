// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Template-group rules.
//!
//! A template is a word shape with one wildcard: `*хэри` means "something,
//! then хэри". Matching a template against a word and keeping what the
//! wildcard covered yields a candidate stem. Templates come in groups keyed by
//! the length of their fixed part, and groups with longer fixed parts run
//! first because a longer literal is a more specific transformation.
//!
//! Two ways to pick which templates to try on a word:
//!
//! - [`TemplateGroupRegexRule`] tests every template's regex. Slow, but needs
//!   nothing except the templates. The offline build uses it to discover
//!   which templates fit each vocabulary word.
//! - [`TemplateGroupTrieRule`] reads that discovery back: look the word up in
//!   the vocabulary, then read its template ids from the association table.
//!   No regex is tested to *choose*; only the chosen ones are applied.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::StemmerData;
use crate::error::{Result, StemError};

/// Wildcard marker in template strings.
pub const WILDCARD: char = '*';

/// Shortest stem a template may leave behind.
pub const DEFAULT_TEMPLATE_MIN_LENGTH: usize = 3;

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    matcher: Regex,
    extractor: Regex,
    fixed_len: usize,
}

fn collapse_wildcards(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut prev_wildcard = false;
    for c in template.chars() {
        if c == WILDCARD {
            if !prev_wildcard {
                out.push(c);
            }
            prev_wildcard = true;
        } else {
            out.push(c);
            prev_wildcard = false;
        }
    }
    out
}

impl Template {
    /// Compile a template string.
    ///
    /// Runs of `*` collapse to one wildcard. Exactly one wildcard group must
    /// remain. The fixed parts are regex fragments, so a bad escape fails here.
    pub fn compile(template: &str) -> Result<Self> {
        let collapsed = collapse_wildcards(template);
        let groups = collapsed.chars().filter(|&c| c == WILDCARD).count();
        if groups != 1 {
            return Err(StemError::rule(
                template,
                format!("expected exactly one wildcard group, found {}", groups),
            ));
        }

        let matcher = format!("^{}$", collapsed.replace(WILDCARD, ".+"));
        let extractor = format!("^{}$", collapsed.replace(WILDCARD, "(?P<stem>.+)"));

        Ok(Self {
            text: template.to_string(),
            matcher: Regex::new(&matcher).map_err(|e| StemError::rule(template, e))?,
            extractor: Regex::new(&extractor).map_err(|e| StemError::rule(template, e))?,
            fixed_len: collapsed.chars().filter(|&c| c != WILDCARD).count(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Characters outside the wildcard.
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// Whole-word match.
    pub fn is_match(&self, word: &str) -> bool {
        self.matcher.is_match(word)
    }

    /// What the wildcard covers, or `None` when the word does not fit.
    pub fn extract_stem<'w>(&self, word: &'w str) -> Option<&'w str> {
        self.extractor
            .captures(word)
            .and_then(|caps| caps.name("stem"))
            .map(|m| m.as_str())
    }
}

/// Behaviour shared by both template-group rules. Implementors only decide
/// which templates are candidates for a word.
pub trait TemplateGroup {
    fn choose_templates(&self, word: &str) -> Vec<&Template>;

    fn min_length(&self) -> usize {
        DEFAULT_TEMPLATE_MIN_LENGTH
    }

    /// Stem left by one template, if long enough.
    fn try_apply_template(&self, template: &Template, word: &str) -> Option<String> {
        template
            .extract_stem(word)
            .filter(|stem| stem.chars().count() >= self.min_length())
            .map(str::to_string)
    }

    fn apply(&self, word: &str) -> (String, bool) {
        self.choose_templates(word)
            .into_iter()
            .find_map(|t| self.try_apply_template(t, word))
            .map_or_else(|| (word.to_string(), false), |stem| (stem, true))
    }

    fn is_applicable(&self, word: &str) -> bool {
        self.choose_templates(word)
            .into_iter()
            .any(|t| self.try_apply_template(t, word).is_some())
    }

    /// Stems from every candidate template, not just the first.
    fn find_possible_stems(&self, word: &str) -> Vec<String> {
        self.choose_templates(word)
            .into_iter()
            .filter_map(|t| self.try_apply_template(t, word))
            .collect()
    }

    /// Templates that produced a stem.
    fn find_suitable_templates(&self, word: &str) -> Vec<String> {
        self.choose_templates(word)
            .into_iter()
            .filter(|t| self.try_apply_template(t, word).is_some())
            .map(|t| t.as_str().to_string())
            .collect()
    }
}

/// Chooses templates by testing each one's regex.
#[derive(Debug, Clone)]
pub struct TemplateGroupRegexRule {
    length: usize,
    templates: Vec<Template>,
    min_length: usize,
}

impl TemplateGroupRegexRule {
    pub fn new<I, S>(length: usize, templates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let templates = templates
            .into_iter()
            .filter(|t| !t.as_ref().is_empty())
            .map(|t| Template::compile(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            length,
            templates,
            min_length: DEFAULT_TEMPLATE_MIN_LENGTH,
        })
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Priority key of the group.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

impl TemplateGroup for TemplateGroupRegexRule {
    fn choose_templates(&self, word: &str) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.is_match(word)).collect()
    }

    fn min_length(&self) -> usize {
        self.min_length
    }
}

/// Chooses templates from the precomputed word → template association.
///
/// Only vocabulary words have candidates; anything else applies nothing.
#[derive(Debug, Clone)]
pub struct TemplateGroupTrieRule {
    data: Arc<StemmerData>,
    /// Indexed by template id.
    compiled: Vec<Template>,
    min_length: usize,
}

impl TemplateGroupTrieRule {
    pub fn new(data: Arc<StemmerData>) -> Result<Self> {
        let compiled = data
            .templates
            .templates()
            .iter()
            .map(|t| Template::compile(t))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            data,
            compiled,
            min_length: DEFAULT_TEMPLATE_MIN_LENGTH,
        })
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn data(&self) -> &StemmerData {
        &self.data
    }
}

impl TemplateGroup for TemplateGroupTrieRule {
    fn choose_templates(&self, word: &str) -> Vec<&Template> {
        let Some(word_id) = self.data.vocabulary.lookup(word) else {
            return Vec::new();
        };
        self.data
            .associations
            .get(word_id)
            .iter()
            .filter_map(|&id| self.compiled.get(id as usize))
            .collect()
    }

    fn min_length(&self) -> usize {
        self.min_length
    }
}

/// One `{ "length": .., "templates": [..] }` entry of a template-group file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroupEntry {
    pub length: usize,
    pub templates: Vec<String>,
}

/// The whole template-group file: the rule engine's only configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateGroupSpec {
    pub groups: Vec<TemplateGroupEntry>,
}

impl TemplateGroupSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Group loose templates by fixed-part length.
    pub fn from_templates<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<TemplateGroupEntry> = Vec::new();
        for template in templates {
            let template: String = template.into();
            let length = collapse_wildcards(&template)
                .chars()
                .filter(|&c| c != WILDCARD)
                .count();
            match groups.iter_mut().find(|g| g.length == length) {
                Some(group) => group.templates.push(template),
                None => groups.push(TemplateGroupEntry {
                    length,
                    templates: vec![template],
                }),
            }
        }
        groups.sort_by(|a, b| b.length.cmp(&a.length));
        Self { groups }
    }

    pub fn template_count(&self) -> usize {
        self.groups.iter().map(|g| g.templates.len()).sum()
    }

    /// Compile every group, ordered by descending `length` (stable for ties).
    ///
    /// Any malformed template fails the whole compilation.
    pub fn compile(&self) -> Result<Vec<TemplateGroupRegexRule>> {
        let mut rules = self
            .groups
            .iter()
            .map(|g| TemplateGroupRegexRule::new(g.length, &g.templates))
            .collect::<Result<Vec<_>>>()?;
        rules.sort_by(|a, b| b.length().cmp(&a.length()));
        Ok(rules)
    }
}
