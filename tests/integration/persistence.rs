//! Stores survive a write → read cycle with identical query answers.

use std::fs;

use stemdex::binary::{read_store, write_store};
use stemdex::{FuzzyQuery, StemmerStore, StoreConfig, UnigramTokenizer};
use tempfile::TempDir;

use crate::common::{reload, sample_data, sample_store, SAMPLE_WORDS};

#[test]
fn test_reloaded_store_answers_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.stemdex");

    let original = sample_store();
    write_store(original.data(), &path).unwrap();
    let reloaded = reload(read_store(&path).unwrap());

    let query = FuzzyQuery::default().with_min_ratio(50.0);
    for word in SAMPLE_WORDS.iter().chain(["кэрал", "пщIэрэ"].iter()) {
        assert_eq!(original.get_templates(word), reloaded.get_templates(word));
        assert_eq!(
            original.find_possible_stems(word, false),
            reloaded.find_possible_stems(word, false)
        );
        assert_eq!(
            original.search_in_tokenized_index(word, &query),
            reloaded.search_in_tokenized_index(word, &query)
        );
    }
}

#[test]
fn test_save_and_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.stemdex");

    sample_store().save(&path).unwrap();
    let tokenizer = UnigramTokenizer::from_alphabet(SAMPLE_WORDS).unwrap();
    let opened = StemmerStore::open(&path, tokenizer, StoreConfig::default()).unwrap();

    assert_eq!(opened.data().vocabulary.len(), SAMPLE_WORDS.len());
    assert_eq!(opened.stem("Iуащхьэхэри"), "Iуащхьэ");
}

#[test]
fn test_overwrite_replaces_file_atomically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.stemdex");
    fs::write(&path, b"not a store").unwrap();

    write_store(&sample_data(), &path).unwrap();
    assert!(read_store(&path).is_ok());

    // no temporary files left next to the store
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let tokenizer = UnigramTokenizer::from_alphabet(SAMPLE_WORDS).unwrap();
    let result = StemmerStore::open(&dir.path().join("missing.stemdex"), tokenizer, StoreConfig::default());
    assert!(matches!(result, Err(stemdex::StemError::Io(_))));
}
