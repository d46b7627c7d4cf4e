// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides the canonical sample vocabulary and store so every test
//! reasons about the same words.

#![doc(hidden)]

use crate::build::build_store;
use crate::config::StoreConfig;
use crate::data::StemmerData;
use crate::rules::TemplateGroupSpec;
use crate::store::StemmerStore;
use crate::tokenize::UnigramTokenizer;

/// A small Kabardian vocabulary with shared stems and shared endings.
pub const SAMPLE_WORDS: &[&str] = &[
    "Iуащхьэ",
    "Iуащхьэхэри",
    "къэрал",
    "къэралыгъуэ",
    "пэрытыныгъэ",
    "хузэфIэкIынут",
    "хузэфIэкIынутэкъым",
    "шхэри",
    "Iувхэри",
];

/// Two template groups, longest first. `*хэ` matches none of the sample words.
pub const SAMPLE_TEMPLATE_GROUPS: &str = r#"[
    {"length": 4, "templates": ["*хэри"]},
    {"length": 2, "templates": ["*ри", "*хэ"]}
]"#;

pub fn sample_spec() -> TemplateGroupSpec {
    TemplateGroupSpec::from_json_str(SAMPLE_TEMPLATE_GROUPS)
        .unwrap_or_else(|e| panic!("sample template groups: {e}"))
}

/// One piece per distinct char of `words`.
pub fn char_tokenizer<S: AsRef<str>>(words: &[S]) -> UnigramTokenizer {
    UnigramTokenizer::from_alphabet(words).unwrap_or_else(|e| panic!("char tokenizer: {e}"))
}

pub fn sample_data() -> StemmerData {
    build_store(SAMPLE_WORDS, &sample_spec()).unwrap_or_else(|e| panic!("sample data: {e}"))
}

pub fn sample_store() -> StemmerStore<UnigramTokenizer> {
    sample_store_with(StoreConfig::default())
}

pub fn sample_store_with(config: StoreConfig) -> StemmerStore<UnigramTokenizer> {
    StemmerStore::load(sample_data(), char_tokenizer(SAMPLE_WORDS), config)
        .unwrap_or_else(|e| panic!("sample store: {e}"))
}
