//! In-memory session serving a fixed result set.
//!
//! Used to drive the export pipeline without a database server.

use super::{ResultCursor, Session};
use crate::{Result, connection::Dialect, error::ExportError, value::CellValue};
use async_trait::async_trait;
use std::collections::VecDeque;

/// Session whose every query returns the same canned result set.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    query_error: Option<String>,
    fetch_error_after: Option<usize>,
}

impl MemorySession {
    /// Creates a session returning `rows` under the given column names.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            query_error: None,
            fetch_error_after: None,
        }
    }

    /// Makes every query fail with `message`.
    #[must_use]
    pub fn with_query_error(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    /// Makes the cursor fail after yielding `rows` rows.
    #[must_use]
    pub fn with_fetch_error_after(mut self, rows: usize) -> Self {
        self.fetch_error_after = Some(rows);
        self
    }
}

#[async_trait]
impl Session for MemorySession {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    async fn query<'a>(&'a mut self, _sql: &str) -> Result<Box<dyn ResultCursor + 'a>> {
        if let Some(message) = &self.query_error {
            return Err(ExportError::query_failed("Prepare failed", message.clone()));
        }

        Ok(Box::new(MemoryCursor {
            columns: self.columns.clone(),
            rows: self.rows.iter().cloned().collect(),
            remaining_before_error: self.fetch_error_after,
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Cursor over a [`MemorySession`] result set.
#[derive(Debug)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: VecDeque<Vec<CellValue>>,
    remaining_before_error: Option<usize>,
}

#[async_trait]
impl ResultCursor for MemoryCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Vec<CellValue>>> {
        if let Some(remaining) = self.remaining_before_error.as_mut() {
            if *remaining == 0 {
                return Err(ExportError::query_failed(
                    "Scan failed",
                    "connection reset while reading rows",
                ));
            }
            *remaining = remaining.saturating_sub(1);
        }
        Ok(self.rows.pop_front())
    }
}
