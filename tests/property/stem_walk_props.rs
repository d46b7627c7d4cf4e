//! The recursive stem walk terminates on any stem graph, cycles included.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use stemdex::{StemWalk, StoreConfig};

use crate::common::{store_with_config, word_strategy};

/// Random word → stems edges over a tiny alphabet, so cycles are common.
fn graph_strategy() -> impl Strategy<Value = HashMap<String, Vec<String>>> {
    prop::collection::vec((word_strategy(), prop::collection::vec(word_strategy(), 0..4)), 0..30)
        .prop_map(|edges| edges.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_walk_respects_depth_and_dedups(
        graph in graph_strategy(),
        start in word_strategy(),
        max_level in 0usize..5,
    ) {
        let walk = StemWalk::new(&start, max_level, |w: &str| {
            graph.get(w).cloned().unwrap_or_default()
        });
        let items: Vec<_> = walk.collect();

        let mut seen = HashSet::new();
        for (level, (word, stem)) in &items {
            prop_assert!(*level <= max_level);
            prop_assert!(graph.get(word).is_some_and(|stems| stems.contains(stem)));
            prop_assert!(seen.insert((word.clone(), stem.clone())), "pair repeated");
        }

        let edges: usize = graph.values().map(Vec::len).sum();
        prop_assert!(items.len() <= edges);
    }

    #[test]
    fn prop_level_zero_is_direct_stems(graph in graph_strategy(), start in word_strategy()) {
        let items: Vec<_> = StemWalk::new(&start, 0, |w: &str| {
            graph.get(w).cloned().unwrap_or_default()
        })
        .collect();
        let mut direct = graph.get(&start).cloned().unwrap_or_default();
        let mut unique = HashSet::new();
        direct.retain(|s| unique.insert(s.clone()));
        let stems: Vec<String> = items.into_iter().map(|(_, (_, stem))| stem).collect();
        prop_assert_eq!(stems, direct);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_store_walk_terminates_within_max_level(
        words in prop::collection::vec(prop::string::string_regex("[абвэ]{3,8}").unwrap(), 1..30),
        query in prop::string::string_regex("[абвэ]{3,8}").unwrap(),
        max_level in 0usize..4,
    ) {
        let mut vocabulary: Vec<&str> = words.iter().map(String::as_str).collect();
        // guarantees at least one template hit
        vocabulary.push("абвэа");
        let config = StoreConfig { max_level, ..StoreConfig::default() };
        let store = store_with_config(&vocabulary, &["*а", "*эа", "*ва"], config);

        for (level, _) in store.find_possible_stems_recursive(&query) {
            prop_assert!(level <= max_level);
        }
    }
}
