//! Buffered CSV output.

use crate::{Result, error::ExportError};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const BUFFER_CAPACITY: usize = 256 * 1024;

/// Append-only CSV writer for exported rows.
///
/// Records are written without a header, with `,` as the delimiter and `\n`
/// as the terminator. Fields are quoted only when they contain the
/// delimiter, a quote or a line break.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    path: PathBuf,
    records: u64,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    ///
    /// Parent directories are not created.
    ///
    /// # Errors
    /// Returns [`ExportError::FileCreate`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ExportError::file_create(path, e))?;
        Ok(Self::from_writer(
            BufWriter::with_capacity(BUFFER_CAPACITY, file),
            path,
        ))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer; `path` is only used in error messages.
    pub fn from_writer(inner: W, path: impl Into<PathBuf>) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);

        Self {
            writer,
            path: path.into(),
            records: 0,
        }
    }

    /// Writes one record.
    ///
    /// # Errors
    /// Returns [`ExportError::FileWrite`] if the record cannot be written,
    /// including a record whose width differs from the first one.
    pub fn write_record<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(fields)
            .map_err(|e| ExportError::file_write(&self.path, e))?;
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    /// Flushes buffered records to the underlying writer.
    ///
    /// # Errors
    /// Returns [`ExportError::FileWrite`] if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ExportError::file_write(&self.path, csv::Error::from(e)))
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// Returns [`ExportError::FileWrite`] if the final flush fails.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        let path = self.path;
        self.writer.into_inner().map_err(|e| {
            let io = std::io::Error::new(e.error().kind(), e.error().to_string());
            ExportError::file_write(path, csv::Error::from(io))
        })
    }

    /// Number of records written so far.
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(rows: &[&[&str]]) -> String {
        let mut sink = CsvSink::from_writer(Vec::new(), "memory.csv");
        for row in rows {
            sink.write_record(*row).unwrap();
        }
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_plain_records_have_no_header() {
        assert_eq!(
            render(&[&["1", "Alice", ""], &["2", "Bob", "7"]]),
            "1,Alice,\n2,Bob,7\n"
        );
    }

    #[test]
    fn test_quoting_only_when_needed() {
        assert_eq!(
            render(&[&["a,b", "say \"hi\"", "two\nlines", "plain"]]),
            "\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\",plain\n"
        );
    }

    #[test]
    fn test_no_records_is_empty_output() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_record_count() {
        let mut sink = CsvSink::from_writer(Vec::new(), "memory.csv");
        sink.write_record(["a"]).unwrap();
        sink.write_record(["b"]).unwrap();
        assert_eq!(sink.records(), 2);
        assert_eq!(sink.path(), Path::new("memory.csv"));
    }

    #[test]
    fn test_width_change_is_a_write_error() {
        let mut sink = CsvSink::from_writer(Vec::new(), "memory.csv");
        sink.write_record(["a", "b"]).unwrap();
        let error = sink.write_record(["c"]).unwrap_err();
        assert!(matches!(error, ExportError::FileWrite { .. }));
        assert_eq!(sink.records(), 1);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let error = CsvSink::create(&path).err().unwrap();
        assert!(matches!(error, ExportError::FileCreate { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,data\n").unwrap();

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_record(["fresh"]).unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
