// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Unigram language-model tokenizer.
//!
//! Each piece has a log-probability score; the segmentation with the highest
//! total score wins. Found with Viterbi over the piece trie:
//!
//! ```text
//! best[0] = 0
//! for each position i reachable:
//!     for each piece p that starts at i:        (common prefixes of word[i..])
//!         best[i + len(p)] = max(best[i] + score(p))
//! ```
//!
//! A character that no piece starts with becomes a one-char unknown token
//! scored well below any real piece, so every word segments.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{Token, TokenId, Tokenizer};
use crate::error::{Result, StemError};
use crate::vocab::PatternTrie;

/// Score gap between the worst piece and an unknown character.
const UNKNOWN_PENALTY: f64 = 10.0;

#[derive(Debug, Clone)]
struct Piece {
    text: String,
    id: TokenId,
    score: f64,
}

/// Viterbi tokenizer over a scored piece vocabulary.
#[derive(Debug, Clone)]
pub struct UnigramTokenizer {
    pieces: Vec<Piece>,
    /// Piece text → index into `pieces`.
    trie: PatternTrie,
    unk_id: TokenId,
    unk_score: f64,
    /// Metaspace marker prepended to every word, when the model uses one.
    word_prefix: Option<char>,
}

struct Cell {
    score: f64,
    start: usize,
    /// Index into `pieces`, `None` for an unknown char.
    piece: Option<usize>,
}

impl UnigramTokenizer {
    /// Build from `(piece, score)` pairs; a piece's id is its position.
    ///
    /// `unk_id` names the id reported for unknown characters. Without one,
    /// unknowns get the id right after the last piece.
    pub fn new(pieces: Vec<(String, f64)>, unk_id: Option<TokenId>) -> Result<Self> {
        let pieces = pieces
            .into_iter()
            .enumerate()
            .map(|(id, (text, score))| Piece {
                text,
                id: id as TokenId,
                score,
            })
            .collect();
        Self::from_pieces(pieces, unk_id)
    }

    fn from_pieces(pieces: Vec<Piece>, unk_id: Option<TokenId>) -> Result<Self> {
        let mut trie = PatternTrie::new();
        let mut min_score = f64::INFINITY;
        let mut max_id = 0;
        for (index, piece) in pieces.iter().enumerate() {
            max_id = max_id.max(piece.id);
            // the unknown piece is never matched as text
            if piece.text.is_empty() || Some(piece.id) == unk_id {
                continue;
            }
            trie.insert(piece.text.chars(), index as u32);
            min_score = min_score.min(piece.score);
        }
        if trie.is_empty() {
            return Err(StemError::TokenizerModel("no pieces".into()));
        }
        Ok(Self {
            unk_id: unk_id.unwrap_or(max_id + 1),
            unk_score: min_score - UNKNOWN_PENALTY,
            pieces,
            trie,
            word_prefix: None,
        })
    }

    /// Prepend a marker char (usually `▁`) to every word before segmenting.
    pub fn with_word_prefix(mut self, marker: char) -> Self {
        self.word_prefix = Some(marker);
        self
    }

    /// Newline-delimited piece list, all pieces scored equally.
    ///
    /// With equal scores Viterbi picks the segmentation with fewest tokens.
    pub fn from_piece_list(text: &str) -> Result<Self> {
        let pieces = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| (line.to_string(), -1.0))
            .collect();
        Self::new(pieces, None)
    }

    /// One piece per distinct char of `words`, all scored equally.
    ///
    /// Pieces are ordered by frequency (descending, ties by char), so the
    /// most common chars get the smallest ids and a given word list always
    /// yields the same ids.
    pub fn from_alphabet<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for word in words {
            for c in word.as_ref().chars() {
                *counts.entry(c).or_insert(0) += 1;
            }
        }
        let mut chars: Vec<(char, usize)> = counts.into_iter().collect();
        chars.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let pieces = chars.into_iter().map(|(c, _)| (c.to_string(), -1.0)).collect();
        Self::new(pieces, None)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_piece_list(&content)
        }
    }

    /// Load a `tokenizer.json`.
    ///
    /// Unigram models carry `vocab: [[piece, score], ...]` and `unk_id`.
    /// BPE and WordPiece carry `vocab: {piece: id}`; those pieces are scored
    /// equally.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let model = root.get("model").unwrap_or(&root);
        let vocab = model
            .get("vocab")
            .ok_or_else(|| StemError::TokenizerModel("missing model.vocab".into()))?;

        let tokenizer = match vocab {
            Value::Array(entries) => {
                let pieces = entries
                    .iter()
                    .map(|entry| {
                        let text = entry.get(0).and_then(Value::as_str);
                        let score = entry.get(1).and_then(Value::as_f64);
                        match (text, score) {
                            (Some(text), Some(score)) => Ok((text.to_string(), score)),
                            _ => Err(StemError::TokenizerModel(format!(
                                "bad unigram entry {}",
                                entry
                            ))),
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                let unk_id = model
                    .get("unk_id")
                    .and_then(Value::as_u64)
                    .map(|id| id as TokenId);
                Self::new(pieces, unk_id)?
            }
            Value::Object(map) => {
                let ids: HashMap<&str, TokenId> = map
                    .iter()
                    .filter_map(|(piece, id)| id.as_u64().map(|id| (piece.as_str(), id as TokenId)))
                    .collect();
                let unk_id = model
                    .get("unk_token")
                    .and_then(Value::as_str)
                    .and_then(|unk| ids.get(unk).copied());
                let mut pieces: Vec<Piece> = ids
                    .into_iter()
                    .map(|(text, id)| Piece {
                        text: text.to_string(),
                        id,
                        score: -1.0,
                    })
                    .collect();
                pieces.sort_by_key(|p| p.id);
                Self::from_pieces(pieces, unk_id)?
            }
            _ => return Err(StemError::TokenizerModel("model.vocab is neither list nor map".into())),
        };

        Ok(match metaspace_marker(&root) {
            Some(marker) => tokenizer.with_word_prefix(marker),
            None => tokenizer,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of pieces (not counting the unknown sentinel).
    pub fn vocab_size(&self) -> usize {
        self.pieces.len()
    }

    pub fn unk_id(&self) -> TokenId {
        self.unk_id
    }

    fn segment(&self, chars: &[char]) -> Vec<Token> {
        let n = chars.len();
        let mut best: Vec<Option<Cell>> = (0..=n).map(|_| None).collect();
        best[0] = Some(Cell {
            score: 0.0,
            start: 0,
            piece: None,
        });

        for i in 0..n {
            let Some(base) = best[i].as_ref().map(|c| c.score) else {
                continue;
            };
            let mut single_char_piece = false;
            for (len, index) in self.trie.common_prefixes(&chars[i..]) {
                let index = index as usize;
                single_char_piece |= len == 1;
                let score = base + self.pieces[index].score;
                relax(&mut best[i + len], score, i, Some(index));
            }
            if !single_char_piece {
                relax(&mut best[i + 1], base + self.unk_score, i, None);
            }
        }

        let mut tokens = Vec::new();
        let mut end = n;
        while end > 0 {
            let Some(cell) = best[end].as_ref() else {
                break;
            };
            let text: String = chars[cell.start..end].iter().collect();
            let id = cell.piece.map_or(self.unk_id, |index| self.pieces[index].id);
            tokens.push(Token { id, text });
            end = cell.start;
        }
        tokens.reverse();
        tokens
    }
}

/// Keep the first candidate unless a later one scores strictly higher.
fn relax(slot: &mut Option<Cell>, score: f64, start: usize, piece: Option<usize>) {
    if slot.as_ref().map_or(true, |cell| score > cell.score) {
        *slot = Some(Cell { score, start, piece });
    }
}

/// Replacement char of a Metaspace pre-tokenizer that adds a prefix space.
fn metaspace_marker(root: &Value) -> Option<char> {
    let pre = root.get("pre_tokenizer")?;
    let candidates: Vec<&Value> = match pre.get("pretokenizers").and_then(Value::as_array) {
        Some(list) => list.iter().collect(),
        None => vec![pre],
    };
    candidates.into_iter().find_map(|p| {
        if p.get("type").and_then(Value::as_str) != Some("Metaspace") {
            return None;
        }
        let adds_prefix = p
            .get("add_prefix_space")
            .and_then(Value::as_bool)
            .unwrap_or(false)
            || matches!(
                p.get("prepend_scheme").and_then(Value::as_str),
                Some("always" | "first")
            );
        if !adds_prefix {
            return None;
        }
        p.get("replacement")
            .and_then(Value::as_str)
            .and_then(|s| s.chars().next())
    })
}

impl Tokenizer for UnigramTokenizer {
    fn encode(&self, word: &str) -> Vec<Token> {
        if word.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = self.word_prefix.into_iter().chain(word.chars()).collect();
        self.segment(&chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(list: &[(&str, f64)]) -> Vec<(String, f64)> {
        list.iter().map(|(p, s)| (p.to_string(), *s)).collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_viterbi_prefers_higher_total_score() {
        let t = UnigramTokenizer::new(
            pieces(&[("къ", -2.0), ("э", -2.0), ("рал", -3.0), ("къэ", -3.0), ("р", -2.0), ("ал", -2.0)]),
            None,
        )
        .unwrap();
        let tokens = t.encode("къэрал");
        assert_eq!(texts(&tokens), vec!["къэ", "рал"]);
        assert_eq!(tokens.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_unknown_chars_get_sentinel_id() {
        let t = UnigramTokenizer::new(pieces(&[("рал", -1.0)]), None).unwrap();
        let tokens = t.encode("крал");
        assert_eq!(texts(&tokens), vec!["к", "рал"]);
        assert_eq!(tokens[0].id, 1);
        assert_eq!(t.unk_id(), 1);
    }

    #[test]
    fn test_deterministic_and_empty() {
        let t = UnigramTokenizer::from_piece_list("къэ\nрал\nкъэрал\n").unwrap();
        assert_eq!(t.encode("къэрал"), t.encode("къэрал"));
        assert_eq!(texts(&t.encode("къэрал")), vec!["къэрал"]);
        assert!(t.encode("").is_empty());
    }

    #[test]
    fn test_load_unigram_json() {
        let json = r#"{
            "pre_tokenizer": {"type": "Metaspace", "replacement": "▁", "prepend_scheme": "always"},
            "model": {"type": "Unigram", "unk_id": 0,
                      "vocab": [["<unk>", 0.0], ["▁къэ", -1.0], ["рал", -1.5], ["▁", -4.0]]}
        }"#;
        let t = UnigramTokenizer::from_json_str(json).unwrap();
        let tokens = t.encode("къэрал");
        assert_eq!(texts(&tokens), vec!["▁къэ", "рал"]);
        assert_eq!(t.encode("щ")[1].id, 0);
    }

    #[test]
    fn test_load_map_vocab_json() {
        let json = r#"{"model": {"type": "BPE", "unk_token": "[UNK]",
                        "vocab": {"[UNK]": 0, "къэ": 1, "рал": 2}}}"#;
        let t = UnigramTokenizer::from_json_str(json).unwrap();
        assert_eq!(t.ids("къэралщ"), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_model_rejected() {
        assert!(matches!(
            UnigramTokenizer::from_piece_list("\n\n"),
            Err(StemError::TokenizerModel(_))
        ));
    }
}
