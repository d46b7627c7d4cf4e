//! Reference oracles for differential testing.
//!
//! Simple, obviously-correct linear scans over the word list. Slow, but
//! there is nothing in them to get wrong.

#![allow(dead_code)]

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Longest vocabulary word that starts `query`, in chars.
pub fn oracle_longest_prefix(vocabulary: &[String], query: &str) -> usize {
    vocabulary
        .iter()
        .filter(|w| query.starts_with(w.as_str()))
        .map(|w| char_len(w))
        .max()
        .unwrap_or(0)
}

/// Longest vocabulary word that ends `query`, in chars.
pub fn oracle_longest_suffix(vocabulary: &[String], query: &str) -> usize {
    vocabulary
        .iter()
        .filter(|w| query.ends_with(w.as_str()))
        .map(|w| char_len(w))
        .max()
        .unwrap_or(0)
}

/// Words with `suffix` right after `prefix_len` arbitrary chars, sorted.
///
/// `exact` requires the word to end with `suffix`.
pub fn oracle_find_by_suffix(
    vocabulary: &[String],
    suffix: &str,
    prefix_len: usize,
    exact: bool,
) -> Vec<String> {
    let wanted = prefix_len + char_len(suffix);
    let mut found: Vec<String> = vocabulary
        .iter()
        .filter(|w| {
            let len = char_len(w);
            let fits = if exact { len == wanted } else { len >= wanted };
            fits && w.chars().skip(prefix_len).collect::<String>().starts_with(suffix)
        })
        .cloned()
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Vocabulary words that are prefixes of `word`, shortest first.
pub fn oracle_sub_words(vocabulary: &[String], word: &str) -> Vec<String> {
    let mut found: Vec<String> = vocabulary
        .iter()
        .filter(|w| word.starts_with(w.as_str()))
        .cloned()
        .collect();
    found.sort_by_key(|w| char_len(w));
    found.dedup();
    found
}

/// Sorted, deduplicated copy of the word list.
pub fn oracle_sorted(vocabulary: &[String]) -> Vec<String> {
    let mut sorted = vocabulary.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}
