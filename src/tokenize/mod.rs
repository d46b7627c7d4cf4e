// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sub-word tokenization.
//!
//! The store only needs one thing from a tokenizer: split a word into an
//! ordered list of `(id, text)` pieces, the same way every time. Anything that
//! can do that plugs in through [`Tokenizer`].
//!
//! Ids matter beyond identity. Tokenizer vocabularies hand out low ids to
//! frequent pieces, and fuzzy search leans on that to order its intersections
//! (see [`crate::store::fuzzy`]).
//!
//! [`UnigramTokenizer`] is the bundled implementation. It reads the common
//! `tokenizer.json` layout, so models trained elsewhere load directly.

mod unigram;

pub use unigram::UnigramTokenizer;

use std::sync::Arc;

/// Sub-word token id.
pub type TokenId = u32;

/// One piece of a tokenized word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
}

impl Token {
    pub fn new(id: TokenId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Deterministic word → token sequence.
///
/// Must return the same tokens for the same word for the lifetime of a
/// loaded model. Shared read-only across threads.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, word: &str) -> Vec<Token>;

    fn ids(&self, word: &str) -> Vec<TokenId> {
        self.encode(word).into_iter().map(|t| t.id).collect()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn encode(&self, word: &str) -> Vec<Token> {
        (**self).encode(word)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn encode(&self, word: &str) -> Vec<Token> {
        (**self).encode(word)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn encode(&self, word: &str) -> Vec<Token> {
        (**self).encode(word)
    }
}

/// True when two single-char tokens are adjacent, a typical OCR-noise shape.
pub fn has_consecutive_single_char_tokens(tokens: &[Token]) -> bool {
    tokens
        .windows(2)
        .any(|pair| pair[0].char_len() == 1 && pair[1].char_len() == 1)
}
