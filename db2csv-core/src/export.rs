//! The export pipeline: connect, query, then coerce and write every row.
//!
//! Errors are returned, never handled here. Resources are released by
//! ownership on every path: the cursor and session are dropped when the
//! function returns, and a failed run still flushes the rows it already
//! wrote, leaving a partial file behind.

use crate::{
    ExportConfig, Result,
    adapters::{ResultCursor, Session, open_session},
    error::ExportError,
    sink::CsvSink,
    value::coerce_row,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Column names of the exported result set
    pub columns: Vec<String>,
    /// Number of CSV records written
    pub rows: u64,
    /// Path of the CSV file
    pub output: PathBuf,
}

/// Runs a complete export as described by `config`.
///
/// # Errors
/// Returns the first error of any stage; see [`ExportError`].
pub async fn run_export(config: &ExportConfig) -> Result<ExportSummary> {
    debug!("Configuration: {:?}", config);
    let session = open_session(config).await?;
    info!("Connected to {} server", session.dialect());
    export_with_session(session, config).await
}

/// Runs the query on an already open session and writes the result set.
///
/// The output file is created only after the query has executed. The
/// session is closed on success; a failure to close is logged, not returned.
///
/// # Errors
/// Returns the first query, file, coercion or write error.
pub async fn export_with_session(
    mut session: Box<dyn Session>,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    let summary = {
        let mut cursor = session.query(config.query()).await?;
        let columns = cursor.columns().to_vec();
        info!("Query returned {} columns", columns.len());

        let mut sink = CsvSink::create(config.output())?;
        info!("Writing to {}", config.output().display());

        let rows = match write_rows(&mut *cursor, &mut sink).await {
            Ok(rows) => rows,
            Err(e) => {
                keep_partial_output(&mut sink);
                return Err(e);
            }
        };
        sink.finish()?;

        ExportSummary {
            columns,
            rows,
            output: config.output().to_path_buf(),
        }
    };

    if let Err(e) = session.close().await {
        warn!("{}", e);
    }

    info!(
        "Export complete: {} rows written to {}",
        summary.rows,
        summary.output.display()
    );
    Ok(summary)
}

/// Streams every row of `cursor` into `sink`, returning the record count.
///
/// Each row must have exactly as many values as the cursor has columns.
///
/// # Errors
/// Returns [`ExportError::RowWidth`] for a row of the wrong width, and any
/// fetch, coercion or write error.
pub async fn write_rows<C, W>(cursor: &mut C, sink: &mut CsvSink<W>) -> Result<u64>
where
    C: ResultCursor + ?Sized,
    W: Write,
{
    let width = cursor.columns().len();

    while let Some(row) = cursor.next_row().await? {
        if row.len() != width {
            return Err(ExportError::RowWidth {
                expected: width,
                actual: row.len(),
            });
        }

        let fields = coerce_row(row, cursor.columns())
            .map_err(|(column, e)| ExportError::coercion(column, e))?;
        trace!("Row {}: {:?}", sink.records(), fields);
        sink.write_record(&fields)?;
    }

    Ok(sink.records())
}

fn keep_partial_output<W: Write>(sink: &mut CsvSink<W>) {
    match sink.flush() {
        Ok(()) => warn!(
            "Export aborted; {} rows already written remain in {}",
            sink.records(),
            sink.path().display()
        ),
        Err(e) => warn!("Could not flush partial output: {}", e),
    }
}
