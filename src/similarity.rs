// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit-distance similarity on a 0–100 scale.

/// Percentage similarity of two words: 100 for identical strings, 0 for
/// nothing in common.
///
/// Normalized Levenshtein over chars, so Cyrillic letters count once each.
/// Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}
