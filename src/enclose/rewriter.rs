//! Enclosure rewriting.
//!
//! Turns the marker-delimited output of the underlying CSV writer into the
//! final, fully enclosed CSV text:
//!
//! | input byte        | output                                |
//! |-------------------|---------------------------------------|
//! | delimiter marker  | `enclosure` `delimiter` `enclosure`   |
//! | enclosure marker  | `enclosure`                           |
//! | `enclosure`       | `enclosure` `enclosure`               |
//! | anything else     | unchanged                             |
//!
//! Markers are single bytes, so a chunk can be rewritten on its own and no
//! state is carried between chunks.

use std::io::{self, Write};

use memchr::memchr3;

use super::dialect::Dialect;
use super::sequence::PlaceholderSequence;

/// Identifier of the forced enclosure stream filter.
pub const FILTER_NAME: &str = "csv.enclose.forced";

/// The byte-level substitution rules for one writer attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewriter {
    markers: PlaceholderSequence,
    delimiter: u8,
    enclosure: u8,
}

impl Rewriter {
    /// Builds the rules replacing `markers` with the real characters of `dialect`.
    pub fn new(markers: PlaceholderSequence, dialect: &Dialect) -> Self {
        Self {
            markers,
            delimiter: dialect.delimiter(),
            enclosure: dialect.enclosure(),
        }
    }

    /// The marker pair this rewriter looks for.
    pub fn markers(&self) -> PlaceholderSequence {
        self.markers
    }

    /// Appends the rewritten form of `chunk` to `out`.
    ///
    /// Total over any input: bytes that are neither a marker nor the
    /// enclosure, including line terminators and non-ASCII bytes, are copied
    /// through untouched.
    pub fn rewrite(&self, chunk: &[u8], out: &mut Vec<u8>) {
        let delimiter_marker = self.markers.delimiter_marker();
        let enclosure_marker = self.markers.enclosure_marker();
        let e = self.enclosure;

        out.reserve(chunk.len() + chunk.len() / 4);
        let mut rest = chunk;
        while let Some(pos) = memchr3(delimiter_marker, enclosure_marker, e, rest) {
            out.extend_from_slice(&rest[..pos]);
            let byte = rest[pos];
            if byte == delimiter_marker {
                out.extend_from_slice(&[e, self.delimiter, e]);
            } else if byte == enclosure_marker {
                out.push(e);
            } else {
                out.extend_from_slice(&[e, e]);
            }
            rest = &rest[pos + 1..];
        }
        out.extend_from_slice(rest);
    }

    /// Convenience wrapper around [`Rewriter::rewrite`] returning a new buffer.
    pub fn rewrite_to_vec(&self, chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(chunk.len());
        self.rewrite(chunk, &mut out);
        out
    }
}

/// An [`io::Write`] adapter that rewrites everything written to it before
/// forwarding it to the wrapped sink.
///
/// Each call to [`write`](Write::write) consumes the whole buffer, so the
/// adapter never holds bytes of its own between calls.
///
/// A failed write to the wrapped sink is final. Part of the rewritten buffer
/// may already be in the sink while the caller still holds the raw bytes, so
/// every later `write` or `flush` fails instead of sending them a second time.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use csv_enclose::{Dialect, EncloseRewriter, PlaceholderSequence};
///
/// let dialect = Dialect::new(b'|', b'"', b'\\').unwrap();
/// let markers = PlaceholderSequence::negotiate("\t\x1f", &dialect).unwrap();
/// let mut sink = EncloseRewriter::new(Vec::new(), markers, &dialect);
///
/// sink.write_all(b"\x1fa\tsay \"hi\"\x1f\n").unwrap();
/// assert_eq!(sink.into_inner(), b"\"a\"|\"say \"\"hi\"\"\"\n");
/// ```
#[derive(Debug)]
pub struct EncloseRewriter<W: Write> {
    inner: W,
    rewriter: Rewriter,
    scratch: Vec<u8>,
    /// Set once a write to `inner` failed.
    failed: bool,
}

impl<W: Write> EncloseRewriter<W> {
    /// Name under which this filter is reported by
    /// [`CsvWriter::stream_filters`](crate::CsvWriter::stream_filters).
    pub const NAME: &'static str = FILTER_NAME;

    /// Wraps `inner`, rewriting `markers` into the characters of `dialect`.
    pub fn new(inner: W, markers: PlaceholderSequence, dialect: &Dialect) -> Self {
        Self {
            inner,
            rewriter: Rewriter::new(markers, dialect),
            scratch: Vec::new(),
            failed: false,
        }
    }

    /// The substitution rules in use.
    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    /// Returns a reference to the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Whether an earlier write to the sink failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Unwraps the sink. Nothing is buffered here, so no data is lost.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for EncloseRewriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            return Err(failed_sink());
        }
        self.scratch.clear();
        self.rewriter.rewrite(buf, &mut self.scratch);
        if let Err(err) = self.inner.write_all(&self.scratch) {
            self.failed = true;
            return Err(err);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.failed {
            return Err(failed_sink());
        }
        self.inner.flush()
    }
}

fn failed_sink() -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        "enclosed output is incomplete after an earlier write error",
    )
}
