use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dialect::Dialect;
use super::field::{field_bytes, Field};
use super::rewriter::{EncloseRewriter, FILTER_NAME};
use super::sequence::PlaceholderSequence;
use crate::error::{ConfigurationError, EncloseError};

/// Line terminator written after every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl From<LineTerminator> for csv::Terminator {
    fn from(terminator: LineTerminator) -> Self {
        match terminator {
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            LineTerminator::Crlf => csv::Terminator::CRLF,
        }
    }
}

/// Statistics for records written through a [`CsvWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Total number of records written.
    pub total_records: u64,
    /// Records written while forced enclosure was active.
    pub enclosed_records: u64,
    /// Records written with minimal quoting.
    pub plain_records: u64,
}

/// Where the underlying `csv` writer currently sends its output.
enum State<W: Write> {
    /// Real dialect, minimal quoting, straight to the sink.
    Plain(csv::Writer<W>),
    /// Marker dialect, output routed through the rewriter.
    Enclosed {
        writer: csv::Writer<EncloseRewriter<W>>,
        markers: PlaceholderSequence,
    },
}

/// Builds a [`CsvWriter`], optionally with forced enclosure already enabled.
///
/// # Example
///
/// ```
/// use csv_enclose::{CsvWriterBuilder, Dialect};
///
/// let mut writer = CsvWriterBuilder::new()
///     .dialect(Dialect::new(b'|', b'"', b'\\').unwrap())
///     .forced_enclosure("\t\x1f")
///     .from_writer(Vec::new())
///     .unwrap();
/// writer.write_record(["1997", "Ford"]).unwrap();
///
/// let output = writer.into_inner().unwrap();
/// assert_eq!(output, b"\"1997\"|\"Ford\"\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvWriterBuilder {
    dialect: Dialect,
    terminator: LineTerminator,
    sequence: Option<String>,
}

impl CsvWriterBuilder {
    /// A builder with the default dialect, `\n` terminators and no enclosure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the real dialect of the output.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the record terminator.
    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Enables forced enclosure with the given placeholder sequence.
    pub fn forced_enclosure(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Builds a writer on top of `sink`.
    pub fn from_writer<W: Write>(&self, sink: W) -> Result<CsvWriter<W>, EncloseError> {
        let mut writer = CsvWriter {
            state: Some(State::Plain(plain_writer(sink, &self.dialect, self.terminator))),
            dialect: self.dialect,
            terminator: self.terminator,
            stats: WriteStats::default(),
        };
        if let Some(sequence) = &self.sequence {
            writer.enable_forced_enclosure(sequence)?;
        }
        Ok(writer)
    }

    /// Builds a writer creating (or truncating) the file at `path`.
    pub fn from_path(&self, path: &Path) -> Result<CsvWriter<File>, EncloseError> {
        self.from_writer(File::create(path)?)
    }
}

/// CSV writer with switchable forced enclosure.
///
/// Records are serialized by the `csv` crate. By default the writer quotes a
/// field only when it has to. After [`enable_forced_enclosure`] every field of
/// every record is wrapped in the enclosure character:
///
/// - the `csv` writer is rebuilt with two private marker bytes standing in for
///   the delimiter and the enclosure, and
/// - the sink is wrapped in an [`EncloseRewriter`] that swaps the markers back
///   and doubles enclosure characters found in the data.
///
/// [`disable_forced_enclosure`] flushes what is pending through the rewriter,
/// unwraps the sink and goes back to minimal quoting with the real dialect.
///
/// [`enable_forced_enclosure`]: CsvWriter::enable_forced_enclosure
/// [`disable_forced_enclosure`]: CsvWriter::disable_forced_enclosure
pub struct CsvWriter<W: Write> {
    /// Only `None` if a state transition panicked halfway.
    state: Option<State<W>>,
    /// The real dialect; never replaced by the markers.
    dialect: Dialect,
    terminator: LineTerminator,
    stats: WriteStats,
}

impl<W: Write> CsvWriter<W> {
    /// Creates a writer with the default dialect and minimal quoting.
    pub fn from_writer(sink: W) -> Self {
        Self::with_dialect(sink, Dialect::default())
    }

    /// Creates a writer with `dialect` and minimal quoting.
    pub fn with_dialect(sink: W, dialect: Dialect) -> Self {
        let terminator = LineTerminator::default();
        Self {
            state: Some(State::Plain(plain_writer(sink, &dialect, terminator))),
            dialect,
            terminator,
            stats: WriteStats::default(),
        }
    }

    /// The real dialect of the output.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Replaces the dialect used for subsequent records.
    ///
    /// Rejected with [`ConfigurationError::AlreadyAttached`] while forced
    /// enclosure is active, since the rewriter captured the old characters.
    pub fn set_dialect(&mut self, dialect: Dialect) -> Result<(), EncloseError> {
        if self.is_enclosed() {
            return Err(ConfigurationError::AlreadyAttached.into());
        }
        dialect.validate()?;
        let sink = self.take_sink()?;
        self.dialect = dialect;
        self.state = Some(State::Plain(plain_writer(sink, &dialect, self.terminator)));
        Ok(())
    }

    /// The delimiter byte the `csv` writer currently emits: the delimiter
    /// marker while enclosure is forced, the real delimiter otherwise.
    pub fn active_delimiter(&self) -> u8 {
        match self.markers() {
            Some(markers) => markers.delimiter_marker(),
            None => self.dialect.delimiter(),
        }
    }

    /// The enclosure byte the `csv` writer currently emits.
    pub fn active_enclosure(&self) -> u8 {
        match self.markers() {
            Some(markers) => markers.enclosure_marker(),
            None => self.dialect.enclosure(),
        }
    }

    /// Whether forced enclosure is active.
    pub fn is_enclosed(&self) -> bool {
        self.markers().is_some()
    }

    /// Names of the filters currently applied to the output stream.
    pub fn stream_filters(&self) -> Vec<&'static str> {
        if self.is_enclosed() {
            vec![FILTER_NAME]
        } else {
            Vec::new()
        }
    }

    /// Whether the filter called `name` is applied to the output stream.
    pub fn has_stream_filter(&self, name: &str) -> bool {
        self.stream_filters().iter().any(|filter| *filter == name)
    }

    /// Statistics for the records written so far.
    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// Forces every subsequent field to be enclosed.
    ///
    /// `sequence` supplies the two marker bytes, see
    /// [`PlaceholderSequence::negotiate`]. Either the markers are bound and the
    /// rewriter installed, or, on error, the writer is left exactly as it was.
    pub fn enable_forced_enclosure(&mut self, sequence: &str) -> Result<(), EncloseError> {
        if self.is_enclosed() {
            return Err(ConfigurationError::AlreadyAttached.into());
        }
        let markers = PlaceholderSequence::negotiate(sequence, &self.dialect)?;
        let sink = self.take_sink()?;
        let rewriter = EncloseRewriter::new(sink, markers, &self.dialect);
        self.state = Some(State::Enclosed {
            writer: enclosed_writer(rewriter, &markers, self.terminator),
            markers,
        });
        debug!(
            delimiter_marker = markers.delimiter_marker(),
            enclosure_marker = markers.enclosure_marker(),
            "forced enclosure enabled"
        );
        Ok(())
    }

    /// Goes back to minimal quoting with the real dialect.
    ///
    /// Does nothing when forced enclosure is not active.
    pub fn disable_forced_enclosure(&mut self) -> Result<(), EncloseError> {
        if !self.is_enclosed() {
            return Ok(());
        }
        let sink = self.take_sink()?;
        self.state = Some(State::Plain(plain_writer(sink, &self.dialect, self.terminator)));
        debug!("forced enclosure disabled");
        Ok(())
    }

    /// Writes one record. Absent (`None`) fields are written as empty fields.
    ///
    /// Under forced enclosure a record without any field is written as a
    /// single empty enclosed field.
    pub fn write_record<I>(&mut self, record: I) -> Result<(), EncloseError>
    where
        I: IntoIterator,
        I::Item: Field,
    {
        let fields: Vec<I::Item> = record.into_iter().collect();
        let enclosed = match self.state_mut()? {
            State::Plain(writer) => {
                writer.write_record(fields.iter().map(|f| field_bytes(f)))?;
                false
            }
            State::Enclosed { writer, markers } => {
                let enclosure_marker = markers.enclosure_marker();
                write_enclosed(writer, enclosure_marker, &fields)?;
                true
            }
        };
        if enclosed {
            self.stats.enclosed_records += 1;
        } else {
            self.stats.plain_records += 1;
        }
        self.stats.total_records += 1;
        Ok(())
    }

    /// Writes every record of `records`, returning how many were written.
    pub fn insert_all<R, I>(&mut self, records: R) -> Result<u64, EncloseError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Field,
    {
        let mut count = 0;
        for record in records {
            self.write_record(record)?;
            count += 1;
        }
        Ok(count)
    }

    /// Flushes pending records to the sink.
    pub fn flush(&mut self) -> Result<(), EncloseError> {
        match self.state_mut()? {
            State::Plain(writer) => writer.flush()?,
            State::Enclosed { writer, .. } => writer.flush()?,
        }
        Ok(())
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> Result<W, EncloseError> {
        self.take_sink()
    }

    fn markers(&self) -> Option<PlaceholderSequence> {
        match &self.state {
            Some(State::Enclosed { markers, .. }) => Some(*markers),
            _ => None,
        }
    }

    fn state_mut(&mut self) -> Result<&mut State<W>, EncloseError> {
        self.state.as_mut().ok_or_else(poisoned)
    }

    /// Flushes and unwraps the sink, restoring the previous state if the
    /// final flush fails.
    fn take_sink(&mut self) -> Result<W, EncloseError> {
        match self.state.take() {
            Some(State::Plain(writer)) => match writer.into_inner() {
                Ok(sink) => Ok(sink),
                Err(err) => {
                    let cause = copy_io_error(err.error());
                    self.state = Some(State::Plain(err.into_inner()));
                    Err(cause.into())
                }
            },
            Some(State::Enclosed { writer, markers }) => match writer.into_inner() {
                Ok(rewriter) => Ok(rewriter.into_inner()),
                Err(err) => {
                    let cause = copy_io_error(err.error());
                    self.state = Some(State::Enclosed {
                        writer: err.into_inner(),
                        markers,
                    });
                    Err(cause.into())
                }
            },
            None => Err(poisoned()),
        }
    }
}

impl CsvWriter<File> {
    /// Creates a writer for the file at `path` with the default dialect.
    pub fn from_path(path: &Path) -> Result<Self, EncloseError> {
        Ok(Self::from_writer(File::create(path)?))
    }
}

fn plain_writer<W: Write>(
    sink: W,
    dialect: &Dialect,
    terminator: LineTerminator,
) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(dialect.delimiter())
        .quote(dialect.enclosure())
        .escape(dialect.escape())
        .double_quote(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(terminator.into())
        .flexible(true)
        .from_writer(sink)
}

// Markers never occur in field data, so the csv writer never has to quote;
// record boundaries are marked by write_enclosed instead.
fn enclosed_writer<W: Write>(
    sink: EncloseRewriter<W>,
    markers: &PlaceholderSequence,
    terminator: LineTerminator,
) -> csv::Writer<EncloseRewriter<W>> {
    WriterBuilder::new()
        .delimiter(markers.delimiter_marker())
        .quote(markers.enclosure_marker())
        .quote_style(QuoteStyle::Never)
        .terminator(terminator.into())
        .flexible(true)
        .from_writer(sink)
}

/// Emits `E f1 D f2 D ... fn E` followed by the terminator: the enclosure
/// marker opens the first field and closes the last one, the csv writer puts
/// the delimiter marker in between.
fn write_enclosed<W: Write, F: Field>(
    writer: &mut csv::Writer<W>,
    enclosure_marker: u8,
    fields: &[F],
) -> Result<(), EncloseError> {
    let last = fields.len().saturating_sub(1);
    let mut edge = Vec::new();
    if fields.is_empty() {
        writer.write_field([enclosure_marker, enclosure_marker])?;
    }
    for (i, field) in fields.iter().enumerate() {
        let bytes = field_bytes(field);
        if i == 0 || i == last {
            edge.clear();
            if i == 0 {
                edge.push(enclosure_marker);
            }
            edge.extend_from_slice(bytes);
            if i == last {
                edge.push(enclosure_marker);
            }
            writer.write_field(&edge)?;
        } else {
            writer.write_field(bytes)?;
        }
    }
    writer.write_record(None::<&[u8]>)?;
    Ok(())
}

fn copy_io_error(err: &io::Error) -> io::Error {
    io::Error::new(err.kind(), err.to_string())
}

fn poisoned() -> EncloseError {
    EncloseError::Io(io::Error::new(
        io::ErrorKind::Other,
        "CSV writer is unusable after an interrupted state change",
    ))
}
