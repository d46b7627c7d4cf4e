//! Binary format robustness: round trips, arbitrary input, corruption.

use proptest::prelude::*;
use stemdex::binary::{decode_store, encode_store};
use stemdex::{build_store, StemmerData, TemplateGroupSpec};

use crate::common::vocabulary_strategy;

const TEMPLATES: &[&str] = &["*а", "*б", "*аб", "*э"];

fn built(words: &[String]) -> Option<StemmerData> {
    build_store(words, &TemplateGroupSpec::from_templates(TEMPLATES.iter().copied())).ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_encode_decode_preserves_data(words in vocabulary_strategy()) {
        let data = built(&words);
        prop_assume!(data.is_some());
        let data = data.unwrap();

        let bytes = encode_store(&data).unwrap();
        let decoded = decode_store(&bytes).unwrap();

        prop_assert_eq!(decoded.vocabulary.keys(), data.vocabulary.keys());
        prop_assert_eq!(decoded.templates.templates(), data.templates.templates());
        prop_assert_eq!(decoded.associations.lists(), data.associations.lists());
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_store(&bytes);
    }

    #[test]
    fn prop_any_flipped_byte_is_rejected(words in vocabulary_strategy(), pick in any::<prop::sample::Index>()) {
        let data = built(&words);
        prop_assume!(data.is_some());
        let mut bytes = encode_store(&data.unwrap()).unwrap();

        let at = pick.index(bytes.len());
        bytes[at] ^= 0x01;
        prop_assert!(decode_store(&bytes).is_err());
    }

    #[test]
    fn prop_truncation_is_rejected(words in vocabulary_strategy(), pick in any::<prop::sample::Index>()) {
        let data = built(&words);
        prop_assume!(data.is_some());
        let bytes = encode_store(&data.unwrap()).unwrap();

        let len = pick.index(bytes.len());
        prop_assert!(decode_store(&bytes[..len]).is_err());
    }
}
