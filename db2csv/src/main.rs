//! db2csv: export the result of one SQL query to a CSV file.
//!
//! All errors travel back to `main`, which logs the failing stage and exits
//! with status 1. Malformed flags exit with clap's usage status.

use db2csv::{Cli, report};
use db2csv_core::{init_logging, run_export};
use std::process::ExitCode;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args(std::env::args_os());
    let quiet = cli.quiet;
    let config = cli.into_config();

    if let Err(e) = init_logging(u8::from(config.debug()), quiet) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Starting export: {}", config);

    let result = run_export(&config).await;
    ExitCode::from(report(&result))
}
