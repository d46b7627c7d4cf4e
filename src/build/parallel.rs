// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel template discovery.
//!
//! Running every template regex against every word is the expensive part of
//! a build, and each word is independent of every other. Rayon fans the
//! words out; the results come back in input order, so the merge that
//! follows is deterministic regardless of thread count.

#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::stemmer::Stemmer;

/// Suitable templates of every word, aligned with `words`.
#[cfg(feature = "parallel")]
pub fn calculate_word_templates_with_progress(
    words: &[String],
    stemmer: &Stemmer,
    progress: &ProgressBar,
) -> Vec<Vec<String>> {
    let counter = AtomicUsize::new(0);
    let total = words.len();

    words
        .par_iter()
        .map(|word| {
            let templates = stemmer.find_suitable_templates(word);

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count % 1000 == 0 || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            templates
        })
        .collect()
}

/// Suitable templates of every word, aligned with `words`.
/// Non-parallel fallback (no progress).
#[cfg(not(feature = "parallel"))]
pub fn calculate_word_templates_with_progress(
    words: &[String],
    stemmer: &Stemmer,
) -> Vec<Vec<String>> {
    words
        .iter()
        .map(|word| stemmer.find_suitable_templates(word))
        .collect()
}
