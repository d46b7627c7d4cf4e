//! Fuzzy search ranking properties.

use std::collections::HashSet;

use proptest::prelude::*;
use stemdex::similarity::ratio;
use stemdex::{build_store, FuzzyQuery, StemmerStore, StoreConfig, TemplateGroupSpec, UnigramTokenizer};

use crate::common::{vocabulary_strategy, word_strategy};

fn store_over(words: &[String]) -> Option<StemmerStore<UnigramTokenizer>> {
    let mut words = words.to_vec();
    // guarantees one template hit
    words.push("абвэ".to_string());
    let data = build_store(words.as_slice(), &TemplateGroupSpec::from_templates(["*э"])).ok()?;
    let tokenizer = UnigramTokenizer::from_alphabet(data.vocabulary.keys()).ok()?;
    StemmerStore::load(data, tokenizer, StoreConfig::default()).ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_results_are_ranked_and_scored(
        words in vocabulary_strategy(),
        query in word_strategy(),
        min_ratio in 0.0f64..100.0,
    ) {
        let store = store_over(&words);
        prop_assume!(store.is_some());
        let store = store.unwrap();

        let found = store.search_in_tokenized_index(&query, &FuzzyQuery::default().with_min_ratio(min_ratio));

        let mut ids = HashSet::new();
        for m in &found {
            prop_assert!(m.score >= min_ratio);
            prop_assert!(ids.insert(m.word_id), "word id repeated");
            prop_assert_eq!(store.lookup(&m.word), Some(m.word_id));
            prop_assert!((m.score - ratio(&query, &m.word)).abs() < 1e-9);
        }
        for pair in found.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].word_id < pair[1].word_id)
            );
        }
    }

    #[test]
    fn prop_known_word_finds_itself(words in vocabulary_strategy(), pick in any::<prop::sample::Index>()) {
        let store = store_over(&words);
        prop_assume!(store.is_some());
        let store = store.unwrap();

        let word = words[pick.index(words.len())].clone();
        let found = store.search_in_tokenized_index(&word, &FuzzyQuery::default().with_min_ratio(0.0));
        prop_assert!(found.iter().any(|m| m.word == word && m.score == 100.0));
    }
}
