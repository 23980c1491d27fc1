//! JSON-lines record source
//!
//! Reads the records fed to the CLI: one JSON array per line, each element a
//! field. Strings are used as-is, numbers and booleans through their JSON text,
//! `null` as an absent field and nested arrays/objects as compact JSON.
//!
//! ```text
//! ["Year", "Make", "Model", "Description", "Price"]
//! [1999, "Chevy", "Venture \"Extended Edition\"", null, "4900.00"]
//! ```

use std::io::BufRead;

use serde_json::Value;

use crate::error::EncloseError;

/// A record parsed from one JSON line.
pub type JsonRecord = Vec<Option<String>>;

/// Iterator over the records of a JSON-lines stream.
///
/// Blank lines are skipped. Errors carry the 1-indexed line number.
pub struct JsonRecordReader<R: BufRead> {
    reader: R,
    buf: String,
    /// Number of lines consumed so far.
    current_line: u64,
}

impl<R: BufRead> JsonRecordReader<R> {
    /// Creates a reader over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            current_line: 0,
        }
    }

    /// Reads the next non-blank record.
    pub fn read_next(&mut self) -> Option<Result<JsonRecord, EncloseError>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.current_line += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            return Some(parse_record(line, self.current_line));
        }
    }

    /// Line number of the record returned last (1-indexed).
    pub fn current_line(&self) -> u64 {
        self.current_line
    }
}

impl<R: BufRead> Iterator for JsonRecordReader<R> {
    type Item = Result<JsonRecord, EncloseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}

/// Parses a single JSON array into a record.
pub fn parse_record(line: &str, line_number: u64) -> Result<JsonRecord, EncloseError> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        EncloseError::InvalidArgument(format!("Line {}: Invalid JSON: {}", line_number, e))
    })?;

    match value {
        Value::Array(values) => Ok(values.into_iter().map(field_value).collect()),
        other => Err(EncloseError::InvalidArgument(format!(
            "Line {}: Expected a JSON array but got {}",
            line_number,
            kind(&other)
        ))),
    }
}

/// Rejects a record with any of the `reserved` bytes in one of its fields.
///
/// Forced enclosure turns placeholder bytes into field boundaries, so a
/// record carrying one would come out with extra fields.
pub fn check_reserved_bytes(
    record: &JsonRecord,
    reserved: &[u8],
    line_number: u64,
) -> Result<(), EncloseError> {
    for (index, field) in record.iter().enumerate() {
        let Some(value) = field else { continue };
        if let Some(byte) = value.bytes().find(|b| reserved.contains(b)) {
            return Err(EncloseError::InvalidArgument(format!(
                "Line {}: field {} contains placeholder byte {:?}",
                line_number,
                index + 1,
                char::from(byte)
            )));
        }
    }
    Ok(())
}

fn field_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
