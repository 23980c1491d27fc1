//! Property-based tests for placeholder negotiation

use proptest::prelude::*;

use csv_enclose::{ConfigurationError, CsvWriter, Dialect, EncloseError, PlaceholderSequence};

/// Strategy for single ASCII bytes, biased towards the default dialect bytes
fn ascii_byte_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![
        Just(b','),
        Just(b'"'),
        Just(b'\\'),
        Just(b'\t'),
        0x01u8..0x80,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    // *For any* two-byte ASCII sequence, negotiation SHALL succeed exactly when
    // the bytes differ and neither is a dialect byte or a line break.
    #[test]
    fn property_negotiation_accepts_only_safe_pairs(
        first in ascii_byte_strategy(),
        second in ascii_byte_strategy(),
    ) {
        let dialect = Dialect::default();
        let sequence: String = [char::from(first), char::from(second)].iter().collect();
        let reserved = [dialect.delimiter(), dialect.enclosure(), dialect.escape(), b'\n', b'\r'];

        let result = PlaceholderSequence::negotiate(&sequence, &dialect);
        if first == second {
            prop_assert_eq!(result, Err(ConfigurationError::DuplicateCharacters(char::from(first))));
        } else if reserved.contains(&first) || reserved.contains(&second) {
            let is_collision = matches!(result, Err(ConfigurationError::CollidesWithDialect { .. }));
            prop_assert!(is_collision);
        } else {
            let markers = result.unwrap();
            prop_assert_eq!(markers.delimiter_marker(), first);
            prop_assert_eq!(markers.enclosure_marker(), second);
        }
    }

    // *For any* sequence whose length is not two bytes, negotiation SHALL fail
    // with InvalidSequenceLength.
    #[test]
    fn property_wrong_length_rejected(sequence in "[a-z]{0,1}|[a-z]{3,8}") {
        prop_assert_eq!(
            PlaceholderSequence::negotiate(&sequence, &Dialect::default()),
            Err(ConfigurationError::InvalidSequenceLength {
                len: sequence.len(),
                ascii: true,
            })
        );
    }

    // *For any* rejected sequence, the writer SHALL keep its dialect and keep
    // writing with minimal quoting.
    #[test]
    fn property_failed_attach_is_atomic(
        first in ascii_byte_strategy(),
        second in ascii_byte_strategy(),
    ) {
        let sequence: String = [char::from(first), char::from(second)].iter().collect();
        let mut writer = CsvWriter::from_writer(Vec::new());

        match writer.enable_forced_enclosure(&sequence) {
            Ok(()) => {
                prop_assert!(writer.is_enclosed());
                prop_assert_eq!(writer.active_delimiter(), first);
                prop_assert_eq!(writer.active_enclosure(), second);
            }
            Err(EncloseError::Configuration(_)) => {
                prop_assert!(!writer.is_enclosed());
                prop_assert_eq!(writer.dialect(), Dialect::default());
                prop_assert_eq!(writer.active_delimiter(), b',');
                prop_assert_eq!(writer.active_enclosure(), b'"');
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
        prop_assert_eq!(writer.dialect(), Dialect::default());
    }
}
