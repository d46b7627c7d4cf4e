//! Vocabulary trie: dense sorted ids and prefix enumeration.

use proptest::prelude::*;
use stemdex::VocabularyTrie;

use crate::common::{vocabulary_strategy, word_strategy};
use crate::oracles::oracle_sorted;

proptest! {
    #[test]
    fn prop_ids_are_dense_and_sorted(vocabulary in vocabulary_strategy()) {
        let trie = VocabularyTrie::build(vocabulary.iter().cloned());
        let sorted = oracle_sorted(&vocabulary);
        prop_assert_eq!(trie.len(), sorted.len());
        for (id, word) in sorted.iter().enumerate() {
            prop_assert_eq!(trie.lookup(word), Some(id as u32));
            prop_assert_eq!(trie.key(id as u32), Some(word.as_str()));
        }
    }

    #[test]
    fn prop_lookup_is_stable_across_builds(vocabulary in vocabulary_strategy()) {
        let forward = VocabularyTrie::build(vocabulary.iter().cloned());
        let reversed = VocabularyTrie::build(vocabulary.iter().rev().cloned());
        for word in &vocabulary {
            prop_assert_eq!(forward.lookup(word), reversed.lookup(word));
        }
    }

    #[test]
    fn prop_empty_prefix_enumerates_every_word_once(vocabulary in vocabulary_strategy()) {
        let trie = VocabularyTrie::build(vocabulary.iter().cloned());
        let all: Vec<&str> = trie.keys_with_prefix("").collect();
        let sorted = oracle_sorted(&vocabulary);
        prop_assert_eq!(all, sorted.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_keys_with_prefix_is_restartable(
        vocabulary in vocabulary_strategy(),
        prefix in word_strategy(),
    ) {
        let trie = VocabularyTrie::build(vocabulary.iter().cloned());
        let iter = trie.keys_with_prefix(&prefix);
        let first: Vec<&str> = iter.clone().collect();
        let second: Vec<&str> = iter.collect();
        prop_assert_eq!(&first, &second);

        let expected: Vec<String> = oracle_sorted(&vocabulary)
            .into_iter()
            .filter(|w| w.starts_with(prefix.as_str()))
            .collect();
        prop_assert_eq!(first, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_unknown_words_are_not_errors(vocabulary in vocabulary_strategy()) {
        let trie = VocabularyTrie::build(vocabulary.iter().cloned());
        prop_assert_eq!(trie.lookup("къэрал"), None);
        prop_assert_eq!(trie.keys_with_prefix("къэ").count(), 0);
    }
}
