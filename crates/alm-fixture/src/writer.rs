//! Streaming JSONL fixture writer.
//!
//! Each record is serialized straight into a buffered file handle followed by
//! `\n`; nothing beyond the current record is held in memory. The buffer is
//! flushed by [`FixtureWriter::finish`] and, on early exit, when the writer is
//! dropped.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use alm_core::enums::LineStyle;
use alm_core::record::Record;
use alm_schema::CompiledSchema;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_jsonlines::JsonLinesWriter;

use crate::error::FixtureError;

/// `serde_json` formatter with the separators of Python's `json.dumps`
/// defaults: `", "` between items and `": "` after keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonFormatter;

impl Formatter for PythonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

enum Sink<W: Write> {
    Python(W),
    Compact(JsonLinesWriter<W>),
}

/// Writes one record per line.
pub struct FixtureWriter<W: Write> {
    sink: Sink<W>,
    validator: Option<CompiledSchema>,
    written: u64,
}

impl FixtureWriter<BufWriter<File>> {
    /// Create (or truncate) the fixture file at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Open` if the file cannot be created.
    pub fn create(path: &Path, style: LineStyle) -> Result<Self, FixtureError> {
        let open_error = |source| FixtureError::Open {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_error)?;
        }
        let file = File::create(path).map_err(open_error)?;
        Ok(Self::new(BufWriter::new(file), style))
    }
}

impl<W: Write> FixtureWriter<W> {
    pub fn new(inner: W, style: LineStyle) -> Self {
        let sink = match style {
            LineStyle::Python => Sink::Python(inner),
            LineStyle::Compact => Sink::Compact(JsonLinesWriter::new(inner)),
        };
        Self {
            sink,
            validator: None,
            written: 0,
        }
    }

    /// Validate every record against `schema` before writing it.
    ///
    /// Validation is warn-only: a failing record is logged and still written.
    #[must_use]
    pub fn with_validation(mut self, schema: CompiledSchema) -> Self {
        self.validator = Some(schema);
        self
    }

    /// Append one record as one line.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if serialization or the underlying write fails.
    pub fn write(&mut self, record: &Record) -> Result<(), FixtureError> {
        if let Some(validator) = &self.validator {
            let value = serde_json::to_value(record)?;
            if let Err(e) = validator.validate(&value) {
                tracing::warn!(
                    input_date = %record.input_date,
                    yeargod = %record.yeargod,
                    "record failed schema validation: {e}"
                );
            }
        }

        match &mut self.sink {
            Sink::Python(out) => {
                let mut serializer =
                    serde_json::Serializer::with_formatter(&mut *out, PythonFormatter);
                record.serialize(&mut serializer)?;
                out.write_all(b"\n")?;
            }
            Sink::Compact(out) => out.write(record)?,
        }
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if the final flush fails.
    pub fn finish(self) -> Result<W, FixtureError> {
        let mut inner = match self.sink {
            Sink::Python(out) => out,
            Sink::Compact(out) => out.into_inner(),
        };
        inner.flush()?;
        Ok(inner)
    }
}

/// Render one record as a line without the trailing newline.
///
/// # Errors
///
/// Returns `FixtureError::Json` if serialization fails.
pub fn render_line(record: &Record, style: LineStyle) -> Result<String, FixtureError> {
    let mut writer = FixtureWriter::new(Vec::new(), style);
    writer.write(record)?;
    let mut bytes = writer.finish()?;
    bytes.pop();
    String::from_utf8(bytes)
        .map_err(|e| FixtureError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
