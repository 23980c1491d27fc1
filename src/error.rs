//! Error module
//!
//! Defines custom error types using `thiserror` for csv-enclose.
//! [`ConfigurationError`] covers everything that can go wrong while attaching
//! forced enclosure to a writer; [`EncloseError`] is the crate-wide error that
//! wraps it together with the CSV, I/O and JSON failures of the surrounding
//! writer and CLI.

use thiserror::Error;

/// Errors raised synchronously when forced enclosure is configured.
///
/// None of these are recovered automatically: the caller has to supply a
/// corrected sequence or dialect, or detach the active enclosure first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The placeholder sequence is not made of exactly two ASCII characters.
    #[error(
        "placeholder sequence must be exactly 2 ASCII characters, got {len}{}",
        non_ascii_note(.ascii)
    )]
    InvalidSequenceLength {
        /// Length of the rejected sequence in characters.
        len: usize,
        /// Whether every character of the sequence is ASCII.
        ascii: bool,
    },

    /// Both placeholder characters are the same.
    #[error("placeholder sequence uses {0:?} twice; the two characters must differ")]
    DuplicateCharacters(char),

    /// A placeholder character equals one of the writer's dialect characters.
    #[error("placeholder character {marker:?} collides with the dialect {role} character")]
    CollidesWithDialect {
        /// The offending placeholder character.
        marker: char,
        /// Which dialect character it collides with (`delimiter`, `enclosure` or `escape`).
        role: &'static str,
    },

    /// Forced enclosure is already active on this writer.
    #[error("forced enclosure is already attached to this writer; detach it first")]
    AlreadyAttached,

    /// The dialect itself is unusable (non-distinct or multi-byte characters).
    #[error("invalid dialect: {0}")]
    InvalidDialect(String),
}

/// The main error type for csv-enclose.
///
/// # Error Categories
///
/// - **Configuration errors**: invalid placeholder sequences or dialects
/// - **CSV errors**: failures reported by the underlying `csv` writer
/// - **File I/O errors**: reading input or writing the output sink
/// - **Argument errors**: invalid CLI argument combinations
///
/// # Example
///
/// ```rust,ignore
/// use csv_enclose::error::EncloseError;
///
/// fn example() -> Result<(), EncloseError> {
///     // Errors from underlying types are automatically converted
///     let file = std::fs::File::open("nonexistent.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum EncloseError {
    /// Forced enclosure could not be configured.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// CSV serialization error from the underlying writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    ///
    /// Raised when a configuration file or a JSON-lines record is malformed.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn non_ascii_note(ascii: &bool) -> &'static str {
    if *ascii {
        ""
    } else {
        " (not all ASCII)"
    }
}
