//! Turns the result of an export into the process exit status.

use db2csv_core::{ExportSummary, Result};
use tracing::{error, info};

/// Exit status of a completed export.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status of any failed export.
pub const EXIT_FAILURE: u8 = 1;

/// Line printed to stdout when an export completes.
pub fn completion_message(summary: &ExportSummary) -> String {
    format!(
        "Export completed: {} rows written to {}",
        summary.rows,
        summary.output.display()
    )
}

/// Prints the completion line or logs the failing stage, and returns the
/// exit status for `result`.
pub fn report(result: &Result<ExportSummary>) -> u8 {
    match result {
        Ok(summary) => {
            info!("✓ Export completed");
            println!("{}", completion_message(summary));
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Export failed during {}: {}", e.stage(), e);
            EXIT_FAILURE
        }
    }
}
