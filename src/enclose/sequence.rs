//! Placeholder negotiation.
//!
//! While forced enclosure is active the underlying CSV writer does not see the
//! real delimiter and enclosure. It is given two private marker bytes instead,
//! which the rewriter later swaps back. This module validates the two-character
//! sequence supplying those markers.

use super::dialect::Dialect;
use crate::error::ConfigurationError;

/// Marker sequence used when the caller does not supply one: TAB stands in
/// for the delimiter and UNIT SEPARATOR (0x1F) for the enclosure.
pub const DEFAULT_SEQUENCE: &str = "\t\x1f";

/// A validated pair of marker bytes.
///
/// Both bytes are distinct from each other and from every byte of the
/// [`Dialect`] they were negotiated against. The markers must also never occur
/// in field data; that part is a caller precondition and is not checked.
///
/// # Example
///
/// ```
/// use csv_enclose::{Dialect, PlaceholderSequence};
///
/// let dialect = Dialect::new(b'|', b'"', b'\\').unwrap();
/// let markers = PlaceholderSequence::negotiate("\t\x1f", &dialect).unwrap();
/// assert_eq!(markers.delimiter_marker(), b'\t');
/// assert_eq!(markers.enclosure_marker(), 0x1f);
///
/// // The enclosure itself cannot be used as a marker
/// assert!(PlaceholderSequence::negotiate("\t\"", &dialect).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderSequence {
    delimiter_marker: u8,
    enclosure_marker: u8,
}

impl PlaceholderSequence {
    /// Validates `sequence` against `dialect`.
    ///
    /// The rules are checked in order and the first failing one is reported:
    ///
    /// 1. exactly two ASCII characters ([`ConfigurationError::InvalidSequenceLength`])
    /// 2. the two characters differ ([`ConfigurationError::DuplicateCharacters`])
    /// 3. neither equals the delimiter, enclosure or escape character, nor a
    ///    line break of the record terminator
    ///    ([`ConfigurationError::CollidesWithDialect`])
    pub fn negotiate(sequence: &str, dialect: &Dialect) -> Result<Self, ConfigurationError> {
        let bytes = sequence.as_bytes();
        if bytes.len() != 2 || !sequence.is_ascii() {
            return Err(ConfigurationError::InvalidSequenceLength {
                len: sequence.chars().count(),
                ascii: sequence.is_ascii(),
            });
        }

        let (delimiter_marker, enclosure_marker) = (bytes[0], bytes[1]);
        if delimiter_marker == enclosure_marker {
            return Err(ConfigurationError::DuplicateCharacters(char::from(
                delimiter_marker,
            )));
        }

        for marker in [delimiter_marker, enclosure_marker] {
            let role = dialect
                .roles()
                .into_iter()
                .find(|(b, _)| *b == marker)
                .map(|(_, role)| role)
                .or_else(|| matches!(marker, b'\n' | b'\r').then_some("line terminator"));
            if let Some(role) = role {
                return Err(ConfigurationError::CollidesWithDialect {
                    marker: char::from(marker),
                    role,
                });
            }
        }

        Ok(Self {
            delimiter_marker,
            enclosure_marker,
        })
    }

    /// Byte standing in for the delimiter.
    pub fn delimiter_marker(&self) -> u8 {
        self.delimiter_marker
    }

    /// Byte standing in for the enclosure.
    pub fn enclosure_marker(&self) -> u8 {
        self.enclosure_marker
    }
}
