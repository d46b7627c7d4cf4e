// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by every fallible operation in the crate.
//!
//! Unknown words are never errors. Lookups against words the vocabulary has
//! never seen return `None` or an empty list. What lands here is broken input:
//! a template that will not compile, a store with missing pieces, or a file
//! whose bytes do not survive the checksum.

use thiserror::Error;

/// Everything that can go wrong while building, persisting, or loading a store.
#[derive(Debug, Error)]
pub enum StemError {
    /// A template or suffix pattern could not be compiled into a rule.
    #[error("rule compilation failed for '{template}': {reason}")]
    RuleCompilation { template: String, reason: String },

    /// A required store component is empty, missing, or inconsistent.
    #[error("invalid store data: {0}")]
    InvalidStoreData(String),

    /// A key list that must be strictly sorted contains the same key twice.
    #[error("duplicate key '{0}'")]
    DuplicateWord(String),

    /// Persisted bytes are corrupted, truncated, or from another version.
    #[error("malformed store file: {0}")]
    Format(String),

    /// A tokenizer model file has no usable vocabulary.
    #[error("invalid tokenizer model: {0}")]
    TokenizerModel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StemError {
    pub(crate) fn rule(template: impl Into<String>, reason: impl ToString) -> Self {
        StemError::RuleCompilation {
            template: template.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StemError>;
