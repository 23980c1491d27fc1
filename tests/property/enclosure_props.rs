//! Property-based tests for forced enclosure
//!
//! Covers the round-trip through a standard CSV reader, total enclosure of
//! plain fields and the chunk independence of the rewriter.

use csv::ReaderBuilder;
use proptest::prelude::*;

use csv_enclose::{CsvWriter, Dialect, PlaceholderSequence, Rewriter};

const SEQUENCE: &str = "\t\x1f";

/// Strategy for field values: CSV special characters included, markers excluded
fn field_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        6 => "[a-zA-Z0-9 ,;|:'\"\\\\é🌍]{0,12}".prop_map(Some),
        2 => "[a-z]{0,5}(\n|\r\n)[a-z\"]{0,5}".prop_map(Some),
    ]
}

/// Strategy for plain field values needing no escaping at all
fn plain_field_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .]{0,12}"
}

/// Strategy for records of one to six fields
fn record_strategy() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(field_strategy(), 1..7)
}

/// Strategy for a delimiter the markers never collide with
fn delimiter_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![Just(b','), Just(b';'), Just(b'|'), Just(b':')]
}

fn marker_rewriter() -> Rewriter {
    let dialect = Dialect::new(b'|', b'"', b'\\').unwrap();
    Rewriter::new(PlaceholderSequence::negotiate(SEQUENCE, &dialect).unwrap(), &dialect)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* records, reading the enclosed output with a standard reader
    // using the real dialect SHALL give back the records, nulls as "".
    #[test]
    fn property_round_trip(
        records in prop::collection::vec(record_strategy(), 1..8),
        delimiter in delimiter_strategy(),
    ) {
        let dialect = Dialect::new(delimiter, b'"', b'\\').unwrap();
        let mut writer = CsvWriter::with_dialect(Vec::new(), dialect);
        writer.enable_forced_enclosure(SEQUENCE).unwrap();
        writer.insert_all(&records).unwrap();
        let output = writer.into_inner().unwrap();

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(output.as_slice());
        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        let expected: Vec<Vec<String>> = records
            .iter()
            .map(|record| record.iter().map(|f| f.clone().unwrap_or_default()).collect())
            .collect();
        prop_assert_eq!(parsed, expected);
    }

    // *For any* record of plain fields, every field SHALL be wrapped in the
    // enclosure even though none needs quoting.
    #[test]
    fn property_total_enclosure(
        fields in prop::collection::vec(plain_field_strategy(), 1..7),
    ) {
        let mut writer = CsvWriter::with_dialect(Vec::new(), Dialect::new(b'|', b'"', b'\\').unwrap());
        writer.enable_forced_enclosure(SEQUENCE).unwrap();
        writer.write_record(&fields).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let expected: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f)).collect();
        prop_assert_eq!(output, format!("{}\n", expected.join("|")));
    }

    // *For any* byte stream and split point, rewriting the two halves SHALL
    // equal rewriting the whole.
    #[test]
    fn property_rewrite_is_chunk_independent(
        bytes in prop::collection::vec(prop_oneof![Just(b'\t'), Just(0x1fu8), Just(b'"'), any::<u8>()], 0..64),
        split in any::<prop::sample::Index>(),
    ) {
        let rewriter = marker_rewriter();
        let at = split.index(bytes.len() + 1);

        let whole = rewriter.rewrite_to_vec(&bytes);
        let mut halves = Vec::new();
        rewriter.rewrite(&bytes[..at], &mut halves);
        rewriter.rewrite(&bytes[at..], &mut halves);
        prop_assert_eq!(halves, whole);
    }

    // *For any* byte stream the output grows by two bytes per delimiter
    // marker and one per literal enclosure, and nothing else changes size.
    #[test]
    fn property_rewrite_length(
        bytes in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let out = marker_rewriter().rewrite_to_vec(&bytes);
        let delimiter_markers = bytes.iter().filter(|&&b| b == b'\t').count();
        let enclosures = bytes.iter().filter(|&&b| b == b'"').count();
        prop_assert_eq!(out.len(), bytes.len() + 2 * delimiter_markers + enclosures);
        prop_assert!(!out.contains(&b'\t'));
        prop_assert!(!out.contains(&0x1f));
    }
}
