//! Library module for the db2csv binary.
//!
//! Exposes the command-line parsing and the exit-status mapping so they can
//! be tested; the export itself lives in `db2csv-core`.

pub mod cli;
pub mod report;

pub use cli::{Cli, PASSWORD_ENV, normalize_flag_syntax};
pub use report::{EXIT_FAILURE, EXIT_SUCCESS, completion_message, report};
