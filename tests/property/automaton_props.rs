//! Dual automaton against brute force.

use proptest::prelude::*;
use stemdex::{MatchPolicy, PatternAutomaton, VocabularyTrie};

use crate::common::{vocabulary_strategy, word_strategy};
use crate::oracles::{
    oracle_find_by_suffix, oracle_longest_prefix, oracle_longest_suffix, oracle_sub_words,
};

fn automaton(vocabulary: &[String]) -> PatternAutomaton {
    PatternAutomaton::build(&VocabularyTrie::build(vocabulary.iter().cloned()))
}

fn queries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("[абвгэ]{0,9}").unwrap(), 40)
}

proptest! {
    // 256 vocabularies × 40 queries = 10,240 (word, vocabulary) pairs
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_longest_prefix_matches_brute_force(
        vocabulary in vocabulary_strategy(),
        queries in queries(),
    ) {
        let automaton = automaton(&vocabulary);
        for query in &queries {
            prop_assert_eq!(
                automaton.longest_prefix(query),
                oracle_longest_prefix(&vocabulary, query),
                "query {:?}", query
            );
        }
    }

    #[test]
    fn prop_longest_suffix_matches_brute_force(
        vocabulary in vocabulary_strategy(),
        queries in queries(),
    ) {
        let automaton = automaton(&vocabulary);
        for query in &queries {
            prop_assert_eq!(
                automaton.longest_suffix(query),
                oracle_longest_suffix(&vocabulary, query),
                "query {:?}", query
            );
            let suffix = automaton.longest_suffix_str(query);
            prop_assert!(query.ends_with(suffix));
        }
    }
}

proptest! {
    #[test]
    fn prop_find_by_suffix_matches_brute_force(
        vocabulary in vocabulary_strategy(),
        suffix in prop::string::string_regex("[абвгэ]{1,3}").unwrap(),
        prefix_len in 0usize..4,
    ) {
        let automaton = automaton(&vocabulary);
        for (exact, policy) in [(true, MatchPolicy::ExactLength), (false, MatchPolicy::AtLeastPrefix)] {
            let found: Vec<String> = automaton
                .find_by_suffix(&suffix, prefix_len, policy)
                .into_iter()
                .map(|(w, _)| w)
                .collect();
            prop_assert_eq!(found, oracle_find_by_suffix(&vocabulary, &suffix, prefix_len, exact));
        }
    }

    #[test]
    fn prop_sub_words_are_prefixes_shortest_first(
        vocabulary in vocabulary_strategy(),
        word in word_strategy(),
    ) {
        let automaton = automaton(&vocabulary);
        let found: Vec<String> = automaton
            .find_sub_words(&word)
            .into_iter()
            .map(|(w, _)| w)
            .collect();
        prop_assert_eq!(found, oracle_sub_words(&vocabulary, &word));
    }

    #[test]
    fn prop_values_are_word_ids(vocabulary in vocabulary_strategy(), word in word_strategy()) {
        let trie = VocabularyTrie::build(vocabulary.iter().cloned());
        let automaton = PatternAutomaton::build(&trie);
        for (w, id) in automaton.find_sub_words(&word) {
            prop_assert_eq!(trie.key(id), Some(w.as_str()));
        }
    }
}
