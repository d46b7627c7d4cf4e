//! Build → load → query workflows with realistic inputs.

use std::fs;

use stemdex::{
    build_store_from_files, RegexSuffixRule, StemError, StemRule, Stemmer, StemmerData,
    StemmerStore, StoreConfig, TemplateGroupSpec, UnigramTokenizer,
};
use stemdex::data::WordTemplateAssociation;
use stemdex::rules::{default_suffix_rules, Condition};
use stemdex::vocab::{TemplateIndex, VocabularyTrie};
use tempfile::TempDir;

use crate::common::{sample_store, store_from, words_of, SAMPLE_TEMPLATE_GROUPS, SAMPLE_WORDS};

// ============================================================================
// FILE-BASED BUILD
// ============================================================================

#[test]
fn test_build_from_files_then_query() {
    let dir = TempDir::new().unwrap();
    let words = dir.path().join("words.txt");
    let groups = dir.path().join("groups.json");
    fs::write(&words, SAMPLE_WORDS.join("\n")).unwrap();
    fs::write(&groups, SAMPLE_TEMPLATE_GROUPS).unwrap();

    let data = build_store_from_files(&words, &groups, false).unwrap();
    let tokenizer = UnigramTokenizer::from_alphabet(SAMPLE_WORDS).unwrap();
    let store = StemmerStore::load(data, tokenizer, StoreConfig::default()).unwrap();

    assert_eq!(store.get_templates("Iуащхьэхэри"), vec!["*хэри", "*ри"]);
    assert_eq!(store.find_possible_stems("Iуащхьэхэри", true), vec!["Iуащхьэ"]);
    assert_eq!(store.stem("Iуащхьэхэри"), "Iуащхьэ");
}

#[test]
fn test_malformed_template_fails_build() {
    let dir = TempDir::new().unwrap();
    let words = dir.path().join("words.txt");
    let groups = dir.path().join("groups.json");
    fs::write(&words, "шхэри\n").unwrap();
    fs::write(&groups, r#"[{"length": 2, "templates": ["*х*ри"]}]"#).unwrap();

    let err = build_store_from_files(&words, &groups, false).unwrap_err();
    assert!(matches!(err, StemError::RuleCompilation { .. }), "got {err:?}");
}

#[test]
fn test_missing_word_list_is_io_error() {
    let dir = TempDir::new().unwrap();
    let groups = dir.path().join("groups.json");
    fs::write(&groups, SAMPLE_TEMPLATE_GROUPS).unwrap();

    let err = build_store_from_files(&dir.path().join("nope.txt"), &groups, false).unwrap_err();
    assert!(matches!(err, StemError::Io(_)));
}

// ============================================================================
// QUERIES
// ============================================================================

#[test]
fn test_fuzzy_search_ranks_related_words_first() {
    let store = store_from(&["къэрал", "къэралыгъуэ", "пэрытыныгъэ"], &["*ыгъуэ"]);
    let query = stemdex::FuzzyQuery::default().with_min_ratio(0.0);
    let found = store.search_in_tokenized_index("кэрал", &query);

    let rank = |w: &str| found.iter().position(|m| m.word == w);
    let unrelated = rank("пэрытыныгъэ").unwrap_or(usize::MAX);
    assert!(rank("къэрал").unwrap() < unrelated);
    assert!(rank("къэралыгъуэ").unwrap() < unrelated);
    assert_eq!(found[0].word, "къэрал");
}

#[test]
fn test_suffix_length_policy() {
    let store = store_from(&["хузэфIэкIынут", "хузэфIэкIынутэкъым"], &["*экъым"]);

    let open = words_of(store.find_by_suffix("зэфIэкIынут", 2, false));
    assert_eq!(open, vec!["хузэфIэкIынут", "хузэфIэкIынутэкъым"]);

    let exact = words_of(store.find_by_suffix("зэфIэкIынут", 2, true));
    assert_eq!(exact, vec!["хузэфIэкIынут"]);
}

#[test]
fn test_prefix_and_sub_words() {
    let store = sample_store();
    assert_eq!(
        words_of(store.find_by_prefix("къэрал")),
        vec!["къэрал", "къэралыгъуэ"]
    );
    assert_eq!(
        words_of(store.find_sub_words("Iуащхьэхэри")),
        vec!["Iуащхьэ", "Iуащхьэхэри"]
    );
}

#[test]
fn test_recursive_stems_follow_known_stems() {
    let store = sample_store();
    let walk: Vec<_> = store.find_possible_stems_recursive("Iуащхьэхэри").collect();
    assert!(walk.contains(&(0, ("Iуащхьэхэри".to_string(), "Iуащхьэ".to_string()))));
    assert!(walk.iter().all(|(level, _)| *level <= store.config().max_level));
}

#[test]
fn test_walk_counts_distinct_pairs() {
    let store = sample_store();
    let mut walk = store.find_possible_stems_recursive("Iуащхьэхэри");
    assert_eq!(walk.seen_pairs(), 0);
    let yielded = walk.by_ref().count();
    assert!(yielded > 0);
    assert_eq!(walk.seen_pairs(), yielded);
}

#[test]
fn test_automaton_shares_prefix_nodes() {
    let store = store_from(&["къэрал", "къэралыгъуэ"], &["*ыгъуэ"]);
    let forward = store.automaton().forward();
    // root plus one node per char of the longer word
    assert_eq!(forward.node_count(), 1 + "къэралыгъуэ".chars().count());
    assert_eq!(forward.len(), 2);
}

#[test]
fn test_unknown_words_return_empty() {
    let store = sample_store();
    assert!(store.lookup("пщIэрэ").is_none());
    assert!(store.get_templates("пщIэрэ").is_empty());
    assert!(store.find_possible_stems("пщIэрэ", false).is_empty());
    assert_eq!(store.stem("пщIэрэ"), "пщIэрэ");
    assert_eq!(store.find_possible_stems_recursive("пщIэрэ").count(), 0);
    assert!(store.find_by_prefix("пщ").is_empty());
}

#[test]
fn test_regex_suffix_rules_in_a_stemmer() {
    let rules = default_suffix_rules().unwrap();
    let stemmer = Stemmer::new(rules.into_iter().map(StemRule::from).collect());

    // "хэри$" is tried before "ри$"
    assert_eq!(stemmer.stem("Iуащхьэхэри"), "Iуащхьэ");
    assert_eq!(stemmer.stem("шхэри"), "шхэ");
    assert_eq!(stemmer.stem("къэрал"), "къэрал");
}

#[test]
fn test_regex_suffix_rule_guards() {
    let rule = RegexSuffixRule::new("ри$")
        .unwrap()
        .with_condition(Condition::MinLength(4))
        .with_excluded(["ахэри"]);
    let stemmer = Stemmer::new(vec![StemRule::from(rule)]);

    assert_eq!(stemmer.stem("шхэри"), "шхэ");
    // word too short
    assert_eq!(stemmer.stem("ари"), "ари");
    assert_eq!(stemmer.stem("ахэри"), "ахэри");
    assert_eq!(stemmer.find_possible_stems("ахэри"), Vec::<String>::new());
}

#[test]
fn test_regex_templates_agree_with_persisted_templates() {
    let rules = TemplateGroupSpec::from_json_str(SAMPLE_TEMPLATE_GROUPS)
        .unwrap()
        .compile()
        .unwrap();
    let stemmer = Stemmer::new(rules.into_iter().map(StemRule::from).collect());
    let store = sample_store();

    for word in SAMPLE_WORDS {
        assert_eq!(
            stemmer.find_suitable_templates(word),
            store.get_templates(word),
            "templates differ for {word}"
        );
    }
}

// ============================================================================
// LOAD VALIDATION
// ============================================================================

#[test]
fn test_load_rejects_empty_data() {
    let data = StemmerData {
        vocabulary: VocabularyTrie::build(Vec::<String>::new()),
        templates: TemplateIndex::build(Vec::<String>::new()),
        associations: WordTemplateAssociation::new(Vec::new()),
    };
    let tokenizer = UnigramTokenizer::from_alphabet(SAMPLE_WORDS).unwrap();
    let err = StemmerStore::load(data, tokenizer, StoreConfig::default()).unwrap_err();
    assert!(matches!(err, StemError::InvalidStoreData(_)));
}
