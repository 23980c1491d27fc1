//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the `Args` struct containing all CLI arguments, the
//! validation of their combinations and the merge with an optional JSON
//! configuration file.

use clap::Parser;
use std::path::PathBuf;

use crate::config::EncloseConfig;
use crate::enclose::{LineTerminator, DEFAULT_SEQUENCE};
use crate::error::EncloseError;

/// Command-line arguments for csv-enclose.
///
/// Use the `validate()` method after parsing to ensure argument combinations
/// are valid, then `resolve_config()` to merge them with `--config`.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use csv_enclose::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// let config = args.resolve_config()?;
/// ```
#[derive(Parser, Debug, Default)]
#[command(name = "csv-enclose")]
#[command(about = "Write JSON-lines records as CSV with every field enclosed")]
#[command(version)]
pub struct Args {
    /// JSON-lines file to read records from (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// CSV file to write (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Enclosure character
    #[arg(long)]
    pub enclosure: Option<char>,

    /// Escape character
    #[arg(long)]
    pub escape: Option<char>,

    /// Two-character placeholder sequence; accepts \t, \\ and \xNN escapes
    #[arg(long)]
    pub sequence: Option<String>,

    /// Only quote fields that need it
    #[arg(long, default_value = "false")]
    pub no_enclose: bool,

    /// Terminate records with \r\n instead of \n
    #[arg(long, default_value = "false")]
    pub crlf: bool,

    /// Log debug information to stderr
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Args {
    /// Validates argument combinations.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the argument combination is valid
    /// - `Err(String)` with a descriptive error message if validation fails
    pub fn validate(&self) -> Result<(), String> {
        if self.no_enclose && self.sequence.is_some() {
            return Err("--sequence cannot be used with --no-enclose".to_string());
        }

        if let Some(sequence) = &self.sequence {
            unescape_sequence(sequence)?;
        }

        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            if input == output {
                return Err("--input and --output must be different files".to_string());
            }
        }

        Ok(())
    }

    /// Merges the configuration file (if any) with the command-line flags.
    ///
    /// Forced enclosure uses [`DEFAULT_SEQUENCE`] unless `--sequence` or the
    /// configuration file names another one, and is off with `--no-enclose`.
    pub fn resolve_config(&self) -> Result<EncloseConfig, EncloseError> {
        let mut config = match &self.config {
            Some(path) => EncloseConfig::from_file(path)?,
            None => EncloseConfig::default(),
        };

        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(enclosure) = self.enclosure {
            config.enclosure = enclosure;
        }
        if let Some(escape) = self.escape {
            config.escape = escape;
        }
        if self.crlf {
            config.terminator = LineTerminator::Crlf;
        }

        if self.no_enclose {
            config.sequence = None;
        } else if let Some(sequence) = &self.sequence {
            let sequence = unescape_sequence(sequence).map_err(EncloseError::InvalidArgument)?;
            config.sequence = Some(sequence);
        } else if config.sequence.is_none() {
            config.sequence = Some(DEFAULT_SEQUENCE.to_string());
        }

        Ok(config)
    }
}

/// Decodes the backslash escapes accepted by `--sequence`.
///
/// Supported: `\t`, `\\` and `\xNN` (two hex digits, ASCII only).
pub fn unescape_sequence(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|b| hex.len() == 2 && b.is_ascii())
                    .ok_or_else(|| format!("Invalid escape \\x{} in --sequence", hex))?;
                out.push(char::from(byte));
            }
            Some(other) => return Err(format!("Unsupported escape \\{} in --sequence", other)),
            None => return Err("--sequence ends with a lone backslash".to_string()),
        }
    }
    Ok(out)
}
