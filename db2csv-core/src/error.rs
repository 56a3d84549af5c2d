//! Error types for the export pipeline.
//!
//! Every stage of an export (connect, query, create file, coerce, write)
//! has its own variant so the top-level handler can log which stage failed.
//! Messages never include the database password.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed driver error carried as the source of connection and query failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The database session could not be opened
    #[error("{context}: {source}")]
    Connection {
        /// Short label naming the failing step
        context: String,
        /// Underlying driver error
        #[source]
        source: BoxError,
    },

    /// The query could not be executed or a row could not be fetched
    #[error("{context}: {source}")]
    Query {
        /// Short label naming the failing step
        context: String,
        /// Underlying driver error
        #[source]
        source: BoxError,
    },

    /// A row's width differs from the cursor's column count
    #[error("Row width mismatch: expected {expected} fields, got {actual}")]
    RowWidth {
        /// Column count fixed when the cursor was opened
        expected: usize,
        /// Number of values in the offending row
        actual: usize,
    },

    /// The output file could not be created
    #[error("Cannot create file {}: {source}", .path.display())]
    FileCreate {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be written or flushed
    #[error("Cannot write to file {}: {source}", .path.display())]
    FileWrite {
        /// Output path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// A value could not be converted into a CSV field
    #[error("Cannot convert column '{column}': {source}")]
    Coercion {
        /// Name of the column holding the value
        column: String,
        /// Underlying coercion error
        #[source]
        source: CoercionError,
    },

    /// The logging subscriber could not be installed
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Description of the failure
        message: String,
    },
}

/// Failure to turn a database value into a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The value's type is known but has no string conversion
    #[error("Unknown datatype: {0}")]
    UnknownType(String),

    /// The driver could not name the value's type
    #[error("Datatype: Nil")]
    NilType,
}

/// Convenience type alias for Results with `ExportError`
pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    /// Creates a connection error with a context label
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Connection {
            context: context.into(),
            source: error.into(),
        }
    }

    /// Creates a query execution error with a context label
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Query {
            context: context.into(),
            source: error.into(),
        }
    }

    /// Creates a file creation error for `path`
    pub fn file_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error for `path`
    pub fn file_write(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a coercion error naming the offending column
    pub fn coercion(column: impl Into<String>, source: CoercionError) -> Self {
        Self::Coercion {
            column: column.into(),
            source,
        }
    }

    /// Creates a logging setup error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Short name of the pipeline stage that failed.
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connect",
            Self::Query { .. } | Self::RowWidth { .. } => "query",
            Self::FileCreate { .. } => "create-output",
            Self::FileWrite { .. } => "write-output",
            Self::Coercion { .. } => "coerce",
            Self::Logging { .. } => "startup",
        }
    }
}
