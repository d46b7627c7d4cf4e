// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline store construction.
//!
//! ```text
//! words.txt ──┐
//!             ├─▶ regex template rules ─▶ suitable templates per word (parallel)
//! groups.json ┘                                      │
//!                                                    ▼
//!                             sorted vocabulary + sorted templates + word → template ids
//! ```
//!
//! Only templates some word actually uses get an id. The merge is
//! single-threaded; the tries are not built for concurrent insertion.

pub mod parallel;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::data::{StemmerData, WordTemplateAssociation};
use crate::error::{Result, StemError};
use crate::rules::{StemRule, TemplateGroupSpec};
use crate::stemmer::Stemmer;
use crate::vocab::{TemplateId, TemplateIndex, VocabularyTrie};

pub use parallel::calculate_word_templates_with_progress;

/// Create a progress style for the build progress bar
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// Split a newline-delimited word list.
///
/// Blank lines are skipped and a repeated word keeps its first occurrence.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    let mut blank = 0usize;
    for line in text.lines() {
        let word = line.trim_end_matches('\r');
        if word.is_empty() {
            blank += 1;
            continue;
        }
        if seen.insert(word) {
            words.push(word.to_string());
        }
    }
    if blank > 0 {
        tracing::warn!(blank, "skipped empty lines in word list");
    }
    words
}

/// Build the persisted triad from a word list and a template-group spec.
pub fn build_store<S: AsRef<str>>(words: &[S], spec: &TemplateGroupSpec) -> Result<StemmerData> {
    build_store_with_progress(words, spec, false)
}

/// [`build_store`] with an optional terminal progress bar.
pub fn build_store_with_progress<S: AsRef<str>>(
    words: &[S],
    spec: &TemplateGroupSpec,
    show_progress: bool,
) -> Result<StemmerData> {
    let start = Instant::now();

    let mut seen = HashSet::new();
    let words: Vec<String> = words
        .iter()
        .map(AsRef::as_ref)
        .filter(|w| !w.is_empty() && seen.insert(*w))
        .map(str::to_string)
        .collect();

    let rules = spec.compile()?;
    let stemmer = Stemmer::new(rules.into_iter().map(StemRule::from).collect());

    #[cfg(feature = "parallel")]
    let per_word = {
        let pb = if show_progress {
            let pb = ProgressBar::new(words.len() as u64);
            pb.set_style(create_progress_style());
            pb.set_prefix("Templates");
            pb.set_message("matching...");
            pb
        } else {
            ProgressBar::hidden()
        };
        let found = calculate_word_templates_with_progress(&words, &stemmer, &pb);
        pb.finish_with_message(format!("matched {} words", words.len()));
        found
    };
    #[cfg(not(feature = "parallel"))]
    let per_word = {
        let _ = show_progress;
        calculate_word_templates_with_progress(&words, &stemmer)
    };

    let data = merge(&words, &per_word)?;

    tracing::info!(
        words = data.vocabulary.len(),
        templates = data.templates.len(),
        pairs = data.associations.pair_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "built stemmer data"
    );
    Ok(data)
}

/// Single-threaded merge into sorted tries and dense association lists.
fn merge(words: &[String], per_word: &[Vec<String>]) -> Result<StemmerData> {
    let templates = TemplateIndex::build(per_word.iter().flatten().cloned());
    if templates.is_empty() {
        return Err(StemError::InvalidStoreData(
            "no word matched any template".into(),
        ));
    }

    let by_word: HashMap<&str, &[String]> = words
        .iter()
        .map(String::as_str)
        .zip(per_word.iter().map(Vec::as_slice))
        .collect();

    let vocabulary = VocabularyTrie::build(words.iter().cloned());
    let mut lists: Vec<Vec<TemplateId>> = Vec::with_capacity(vocabulary.len());
    for (word, _) in vocabulary.iter() {
        let found = by_word.get(word).copied().unwrap_or_default();
        lists.push(
            found
                .iter()
                .filter_map(|template| templates.id(template))
                .collect(),
        );
    }

    Ok(StemmerData {
        vocabulary,
        templates,
        associations: WordTemplateAssociation::new(lists),
    })
}

/// Read a word list and a template-group JSON file, then build.
pub fn build_store_from_files(
    words_path: &Path,
    spec_path: &Path,
    show_progress: bool,
) -> Result<StemmerData> {
    let words = parse_word_list(&fs::read_to_string(words_path)?);
    let spec = TemplateGroupSpec::from_json_file(spec_path)?;
    tracing::info!(
        words = words.len(),
        groups = spec.groups.len(),
        templates = spec.template_count(),
        "read build inputs"
    );
    build_store_with_progress(&words, &spec, show_progress)
}
