//! Core export pipeline for db2csv.
//!
//! db2csv connects to a database, runs one query and writes the result set
//! to a CSV file. This crate holds everything except the command line:
//!
//! - [`ExportConfig`]: the immutable description of a run
//! - [`adapters`]: database sessions and forward-only cursors
//! - [`CellValue`]: driver values reduced to a closed set of cases
//! - [`CsvSink`]: buffered, header-less CSV output
//! - [`run_export`]: the pipeline tying them together
//!
//! # Security
//! - The password is held in zeroize-on-drop storage
//! - Configuration and connection strings display with the password masked
//! - Errors carry driver messages only, never credentials

pub mod adapters;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod logging;
pub mod sink;
pub mod value;

// Re-export commonly used types
pub use adapters::{ResultCursor, Session, open_session};
pub use config::ExportConfig;
pub use connection::{ConnectionString, Dialect};
pub use error::{CoercionError, ExportError, Result};
pub use export::{ExportSummary, export_with_session, run_export, write_rows};
pub use logging::init_logging;
pub use sink::CsvSink;
pub use value::CellValue;
