// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The persisted triad: vocabulary, templates, and which templates fit which word.
//!
//! Everything else a store needs (automata, token postings, affix tables) is
//! derived from these three at load time, so this is the only state that is
//! ever written to disk.

use crate::error::{Result, StemError};
use crate::vocab::{TemplateId, TemplateIndex, VocabularyTrie, WordId};

/// Word id → ordered template ids.
///
/// Dense: one (possibly empty) list per vocabulary word. Order is the order
/// in which the rule set found the templates, most specific group first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTemplateAssociation {
    lists: Vec<Vec<TemplateId>>,
}

impl WordTemplateAssociation {
    pub fn new(lists: Vec<Vec<TemplateId>>) -> Self {
        Self { lists }
    }

    /// Template ids for a word; empty for unknown ids.
    pub fn get(&self, word_id: WordId) -> &[TemplateId] {
        self.lists.get(word_id as usize).map_or(&[], Vec::as_slice)
    }

    /// Number of word slots (equals the vocabulary size when well-formed).
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// True when no word has any template.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Total `(word, template)` pairs.
    pub fn pair_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn lists(&self) -> &[Vec<TemplateId>] {
        &self.lists
    }
}

/// Everything a store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemmerData {
    pub vocabulary: VocabularyTrie,
    pub templates: TemplateIndex,
    pub associations: WordTemplateAssociation,
}

impl StemmerData {
    /// Check the invariants every store operation relies on.
    ///
    /// - no component is empty
    /// - one association slot per word
    /// - every referenced template id exists
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(StemError::InvalidStoreData("vocabulary is empty".into()));
        }
        if self.templates.is_empty() {
            return Err(StemError::InvalidStoreData("template index is empty".into()));
        }
        if self.associations.is_empty() {
            return Err(StemError::InvalidStoreData(
                "word-template association is empty".into(),
            ));
        }
        if self.associations.len() != self.vocabulary.len() {
            return Err(StemError::InvalidStoreData(format!(
                "{} association slots for {} words",
                self.associations.len(),
                self.vocabulary.len()
            )));
        }
        let template_count = self.templates.len() as TemplateId;
        for (word_id, list) in self.associations.lists().iter().enumerate() {
            if let Some(bad) = list.iter().find(|&&id| id >= template_count) {
                return Err(StemError::InvalidStoreData(format!(
                    "word {} references template id {} (only {} templates)",
                    word_id, bad, template_count
                )));
            }
        }
        Ok(())
    }

    /// Templates of a word as strings; empty when the word is unknown.
    pub fn templates_of(&self, word: &str) -> Vec<&str> {
        self.vocabulary
            .lookup(word)
            .map(|id| {
                self.associations
                    .get(id)
                    .iter()
                    .filter_map(|&t| self.templates.template(t))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> StemmerData {
        let vocabulary = VocabularyTrie::build(["Iуащхьэхэри", "къэрал"]);
        let templates = TemplateIndex::build(["*хэри", "*эхэри"]);
        let hheri = templates.id("*хэри").unwrap();
        let ehheri = templates.id("*эхэри").unwrap();
        let mut lists = vec![Vec::new(); vocabulary.len()];
        lists[vocabulary.lookup("Iуащхьэхэри").unwrap() as usize] = vec![ehheri, hheri];
        StemmerData {
            vocabulary,
            templates,
            associations: WordTemplateAssociation::new(lists),
        }
    }

    #[test]
    fn test_valid_data() {
        let data = data();
        assert!(data.validate().is_ok());
        assert_eq!(data.templates_of("Iуащхьэхэри"), vec!["*эхэри", "*хэри"]);
        assert!(data.templates_of("къэрал").is_empty());
        assert!(data.templates_of("кэрал").is_empty());
        assert_eq!(data.associations.pair_count(), 2);
    }

    #[test]
    fn test_empty_components_rejected() {
        let mut empty_vocab = data();
        empty_vocab.vocabulary = VocabularyTrie::default();
        assert!(matches!(
            empty_vocab.validate(),
            Err(StemError::InvalidStoreData(_))
        ));

        let mut no_pairs = data();
        no_pairs.associations = WordTemplateAssociation::new(vec![Vec::new(); 2]);
        assert!(matches!(no_pairs.validate(), Err(StemError::InvalidStoreData(_))));
    }

    #[test]
    fn test_dangling_template_id_rejected() {
        let mut bad = data();
        bad.associations = WordTemplateAssociation::new(vec![vec![7], vec![]]);
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("template id 7"));
    }
}
