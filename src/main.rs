//! csv-enclose - Write records as CSV with every field enclosed
//!
//! Reads JSON-lines records (one JSON array per line) from a file or stdin and
//! writes them as CSV, wrapping every field in the enclosure character.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O error |
//! | 4 | Runtime error (unrecoverable) |

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use csv_enclose::cli::Args;
use csv_enclose::config::EncloseConfig;
use csv_enclose::error::EncloseError;
use csv_enclose::records::{check_reserved_bytes, JsonRecordReader};

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for runtime errors (unrecoverable)
const EXIT_RUNTIME_ERROR: u8 = 4;

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Logs go to stderr so they never mix with CSV written to stdout.
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), EncloseError> {
    let config = args.resolve_config()?;
    debug!(?config, "resolved configuration");

    let input: Box<dyn io::BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let written = convert(&config, input, output)?;
    info!(records = written, "conversion complete");
    Ok(())
}

/// Writes every record of `input` to `output` using `config`.
fn convert<R: io::BufRead, W: Write>(
    config: &EncloseConfig,
    input: R,
    output: W,
) -> Result<u64, EncloseError> {
    let mut writer = config.builder()?.from_writer(output)?;
    let reserved = if writer.is_enclosed() {
        vec![writer.active_delimiter(), writer.active_enclosure()]
    } else {
        Vec::new()
    };

    let mut records = JsonRecordReader::new(input);
    while let Some(record) = records.read_next() {
        let record = record?;
        check_reserved_bytes(&record, &reserved, records.current_line())?;
        writer.write_record(record)?;
    }
    let written = writer.stats().total_records;
    writer.into_inner()?.flush()?;
    Ok(written)
}

/// Maps an error to the process exit code.
fn error_to_exit_code(error: &EncloseError) -> u8 {
    match error {
        EncloseError::Configuration(_) => EXIT_CONFIG_ERROR,
        EncloseError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        EncloseError::Json(_) => EXIT_CONFIG_ERROR,
        EncloseError::Io(_) => EXIT_IO_ERROR,
        EncloseError::Csv(_) => EXIT_RUNTIME_ERROR,
    }
}
