//! Connection string construction and dialect selection.
//!
//! The connection string is rendered in the ADO-style `key=value;` form the
//! SQL Server tooling understands. It embeds the query text as a `query`
//! parameter as well; the SQL Server adapter ignores that parameter.
//!
//! Sessions are opened from the typed [`ExportConfig`], so the rendered string
//! only ever reaches the debug log and is kept with the password masked.

use crate::ExportConfig;
use std::fmt;
use std::str::FromStr;

/// Database dialects the exporter can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Microsoft SQL Server over TDS
    SqlServer,
}

impl Dialect {
    /// Canonical name of the dialect.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqlServer => "mssql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `dbtype` names no known dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported database type '{0}'")]
pub struct UnsupportedDialect(pub String);

impl FromStr for Dialect {
    type Err = UnsupportedDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mssql" | "sqlserver" => Ok(Self::SqlServer),
            other => Err(UnsupportedDialect(other.to_string())),
        }
    }
}

/// Connection string built from an [`ExportConfig`], password masked.
///
/// Exists for the `-debug` log; the password never enters it.
///
/// # Example
/// ```rust
/// use db2csv_core::{ConnectionString, ExportConfig};
///
/// let config = ExportConfig::default()
///     .with_server("sql01")
///     .with_user("sa")
///     .with_password("secret")
///     .with_database("sales")
///     .with_query("SELECT 1");
///
/// let conn = ConnectionString::build(&config);
/// assert_eq!(
///     conn.to_string(),
///     "server=sql01;user id=sa;password=****;port=1433;database=sales;query=SELECT 1;"
/// );
/// ```
pub struct ConnectionString {
    redacted: String,
}

impl ConnectionString {
    /// Renders the connection string for `config`.
    pub fn build(config: &ExportConfig) -> Self {
        Self {
            redacted: render(config, "****"),
        }
    }

    /// The string with the password masked.
    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

fn render(config: &ExportConfig, password: &str) -> String {
    format!(
        "server={};user id={};password={};port={};database={};query={};",
        config.server(),
        config.user(),
        password,
        config.port(),
        config.database(),
        config.query()
    )
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionString")
            .field(&self.redacted)
            .finish()
    }
}
