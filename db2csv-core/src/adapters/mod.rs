//! Database adapters.
//!
//! An adapter turns a driver's session and result stream into the two small
//! traits the export pipeline needs: a [`Session`] that runs one query, and
//! a forward-only [`ResultCursor`] over its rows. Values leave the adapter as
//! [`CellValue`]s, so nothing past this module sees driver types.

use crate::{
    ExportConfig, Result,
    connection::{ConnectionString, Dialect},
    error::ExportError,
    value::CellValue,
};
use async_trait::async_trait;
use tracing::{debug, info};

#[cfg(any(test, feature = "testing"))]
pub mod memory;
#[cfg(feature = "mssql")]
pub mod mssql;

/// Forward-only, single-pass cursor over a query's rows.
///
/// Column names are known before the first row is fetched and never change.
#[async_trait]
pub trait ResultCursor: Send {
    /// Column names, in result order.
    fn columns(&self) -> &[String];

    /// Fetches the next row, or `None` once the result set is exhausted.
    ///
    /// # Errors
    /// Returns [`ExportError::Query`] if the driver fails while fetching.
    async fn next_row(&mut self) -> Result<Option<Vec<CellValue>>>;
}

/// An open database session.
///
/// Dropping a session releases it; [`Session::close`] releases it
/// gracefully and reports errors.
#[async_trait]
pub trait Session: Send {
    /// Dialect of the connected server.
    fn dialect(&self) -> Dialect;

    /// Executes `sql` and returns a cursor over its first result set.
    ///
    /// # Errors
    /// Returns [`ExportError::Query`] if the statement cannot be executed.
    async fn query<'a>(&'a mut self, sql: &str) -> Result<Box<dyn ResultCursor + 'a>>;

    /// Closes the session.
    ///
    /// # Errors
    /// Returns [`ExportError::Connection`] if the server did not acknowledge
    /// the close.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens a session for the dialect named by `config.dbtype()`.
///
/// # Errors
/// Returns [`ExportError::Connection`] for an unknown dialect, a dialect not
/// compiled into this build, or a failed connection attempt.
pub async fn open_session(config: &ExportConfig) -> Result<Box<dyn Session>> {
    let dialect: Dialect = config
        .dbtype()
        .parse()
        .map_err(|e| ExportError::connection_failed("Open connection failed", e))?;

    let connection_string = ConnectionString::build(config);
    debug!("Connection string: {}", connection_string);
    info!(
        "Connecting to {} server {}:{}",
        dialect,
        config.server(),
        config.port()
    );

    match dialect {
        #[cfg(feature = "mssql")]
        Dialect::SqlServer => {
            let session = mssql::MssqlSession::connect(config).await?;
            Ok(Box::new(session))
        }
        #[cfg(not(feature = "mssql"))]
        Dialect::SqlServer => Err(ExportError::connection_failed(
            "Open connection failed",
            "SQL Server support not available. Compile with --features mssql",
        )),
    }
}
