//! Logging setup shared by the db2csv binary and tests.

use crate::Result;

/// Maps the CLI verbosity flags onto a maximum log level.
///
/// `quiet` wins over any verbosity; 0 is INFO, 1 (`-debug`) is DEBUG and
/// anything higher is TRACE.
pub const fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// Logs are written to stderr so stdout only carries the completion message.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
///
/// # Example
/// ```rust,no_run
/// use db2csv_core::logging::init_logging;
///
/// // Initialize at DEBUG level
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::ExportError::logging(format!("Failed to initialize logging: {e}"))
        })?;

    Ok(())
}
