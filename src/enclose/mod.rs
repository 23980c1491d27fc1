//! Forced enclosure module
//!
//! Writes CSV where every field is wrapped in the enclosure character, even
//! fields that would not need quoting.
//!
//! The `csv` crate only quotes when it has to. To force enclosure the writer is
//! switched to a private marker dialect (see [`PlaceholderSequence`]) and its
//! output is piped through an [`EncloseRewriter`], which turns the markers back
//! into the real delimiter and enclosure and doubles enclosure characters that
//! belong to the data.
//!
//! # Example
//!
//! ```
//! use csv_enclose::enclose::{CsvWriter, Dialect};
//!
//! let mut writer = CsvWriter::with_dialect(Vec::new(), Dialect::new(b'|', b'"', b'\\').unwrap());
//! writer.enable_forced_enclosure("\t\x1f").unwrap();
//! writer
//!     .write_record([Some("1999"), Some("Chevy"), Some("Venture \"Extended Edition\""), None, Some("4900.00")])
//!     .unwrap();
//!
//! let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(output, "\"1999\"|\"Chevy\"|\"Venture \"\"Extended Edition\"\"\"|\"\"|\"4900.00\"\n");
//! ```

pub mod dialect;
pub mod field;
pub mod rewriter;
pub mod sequence;
pub mod writer;

pub use dialect::Dialect;
pub use field::Field;
pub use rewriter::{EncloseRewriter, Rewriter, FILTER_NAME};
pub use sequence::{PlaceholderSequence, DEFAULT_SEQUENCE};
pub use writer::{CsvWriter, CsvWriterBuilder, LineTerminator, WriteStats};
