//! csv-enclose Library
//!
//! CSV writing where every field is wrapped in the enclosure character,
//! including fields that would not need quoting. It includes modules for the
//! forced enclosure writer, JSON configuration, JSON-lines record conversion
//! and CLI argument parsing.

pub mod cli;
pub mod config;
pub mod enclose;
pub mod error;
pub mod records;

use std::io::Write;

pub use enclose::{
    CsvWriter, CsvWriterBuilder, Dialect, EncloseRewriter, Field, LineTerminator,
    PlaceholderSequence, Rewriter, WriteStats, DEFAULT_SEQUENCE, FILTER_NAME,
};
pub use error::{ConfigurationError, EncloseError};

/// Forces every field written by `writer` from now on to be enclosed.
///
/// See [`CsvWriter::enable_forced_enclosure`].
pub fn enable_forced_enclosure<W: Write>(
    writer: &mut CsvWriter<W>,
    sequence: &str,
) -> Result<(), EncloseError> {
    writer.enable_forced_enclosure(sequence)
}

/// Restores minimal quoting with the writer's real dialect.
///
/// See [`CsvWriter::disable_forced_enclosure`].
pub fn disable_forced_enclosure<W: Write>(writer: &mut CsvWriter<W>) -> Result<(), EncloseError> {
    writer.disable_forced_enclosure()
}
