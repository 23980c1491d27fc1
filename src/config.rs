//! Writer configuration module
//!
//! Loads the dialect, line terminator and optional forced enclosure sequence
//! from a JSON file.
//!
//! # Example
//!
//! ```json
//! {
//!     "delimiter": "|",
//!     "enclosure": "\"",
//!     "escape": "\\",
//!     "sequence": "\t\u001f",
//!     "terminator": "crlf"
//! }
//! ```
//!
//! Every key is optional. Missing keys fall back to `,` `"` `\`, no forced
//! enclosure and `\n` terminators.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::enclose::{CsvWriterBuilder, Dialect, LineTerminator};
use crate::error::{ConfigurationError, EncloseError};

/// Writer settings as found in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncloseConfig {
    /// Field delimiter.
    pub delimiter: char,
    /// Enclosure character.
    pub enclosure: char,
    /// Escape character.
    pub escape: char,
    /// Placeholder sequence; forced enclosure is enabled when present.
    pub sequence: Option<String>,
    /// Record terminator.
    pub terminator: LineTerminator,
}

impl Default for EncloseConfig {
    fn default() -> Self {
        let dialect = Dialect::default();
        Self {
            delimiter: char::from(dialect.delimiter()),
            enclosure: char::from(dialect.enclosure()),
            escape: char::from(dialect.escape()),
            sequence: None,
            terminator: LineTerminator::default(),
        }
    }
}

impl EncloseConfig {
    /// Reads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, EncloseError> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EncloseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The dialect described by this configuration.
    pub fn dialect(&self) -> Result<Dialect, ConfigurationError> {
        Dialect::from_chars(self.delimiter, self.enclosure, self.escape)
    }

    /// A writer builder carrying every setting of this configuration.
    ///
    /// The sequence is only validated once the writer is built.
    pub fn builder(&self) -> Result<CsvWriterBuilder, EncloseError> {
        let mut builder = CsvWriterBuilder::new()
            .dialect(self.dialect()?)
            .terminator(self.terminator);
        if let Some(sequence) = &self.sequence {
            builder = builder.forced_enclosure(sequence.clone());
        }
        Ok(builder)
    }
}
