//! Shared test utilities and fixtures.

#![allow(dead_code)]

use proptest::prelude::*;
use stemdex::vocab::WordId;
use stemdex::{build_store, StemmerData, StemmerStore, StoreConfig, TemplateGroupSpec, UnigramTokenizer};

// Re-export canonical fixtures from stemdex::testing
pub use stemdex::testing::{sample_data, sample_spec, sample_store, SAMPLE_TEMPLATE_GROUPS, SAMPLE_WORDS};

// ============================================================================
// FIXTURES
// ============================================================================

/// Store over `words` with the given templates and a per-char tokenizer.
pub fn store_from(words: &[&str], templates: &[&str]) -> StemmerStore<UnigramTokenizer> {
    store_with_config(words, templates, StoreConfig::default())
}

pub fn store_with_config(
    words: &[&str],
    templates: &[&str],
    config: StoreConfig,
) -> StemmerStore<UnigramTokenizer> {
    let data = build_store(words, &TemplateGroupSpec::from_templates(templates.iter().copied()))
        .expect("build failed");
    let tokenizer = UnigramTokenizer::from_alphabet(data.vocabulary.keys()).expect("tokenizer");
    StemmerStore::load(data, tokenizer, config).expect("load failed")
}

/// Rebuild a store around persisted data, the way a fresh process would.
pub fn reload(data: StemmerData) -> StemmerStore<UnigramTokenizer> {
    let tokenizer = UnigramTokenizer::from_alphabet(data.vocabulary.keys()).expect("tokenizer");
    StemmerStore::load(data, tokenizer, StoreConfig::default()).expect("load failed")
}

/// Drop the ids from `(word, id)` results.
pub fn words_of(found: Vec<(String, WordId)>) -> Vec<String> {
    found.into_iter().map(|(w, _)| w).collect()
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Short words over a tiny Cyrillic alphabet, so random vocabularies share
/// prefixes and suffixes often.
pub fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[абвгэ]{1,6}").expect("valid regex")
}

pub fn vocabulary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_strategy(), 1..40)
}
