//! SQL Server adapter built on Tiberius.
//!
//! Opens one TDS session over TCP, runs the export query as a plain batch,
//! and maps each column value onto [`CellValue`]:
//!
//! - integer types (`tinyint` .. `bigint`) become `Integer`
//! - character types and `xml` become `Text`
//! - binary types become `Bytes`
//! - `decimal`/`numeric`/`money` become `Bytes` holding the decimal text
//! - `NULL` of any type becomes `Null`
//! - everything else is `Unrecognized`, named with its SQL type

use super::{ResultCursor, Session};
use crate::{ExportConfig, Result, connection::Dialect, error::ExportError, value::CellValue};
use async_trait::async_trait;
use futures::{TryStreamExt, stream::BoxStream};
use tiberius::{AuthMethod, Client, ColumnData, Config, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

/// Live SQL Server session.
pub struct MssqlSession {
    client: Client<Compat<TcpStream>>,
}

impl MssqlSession {
    /// Connects and logs in with SQL Server authentication.
    ///
    /// # Security
    /// The password is handed to Tiberius and never logged; errors carry the
    /// driver message only.
    ///
    /// # Errors
    /// Returns [`ExportError::Connection`] if the TCP connection or the login
    /// fails.
    pub async fn connect(config: &ExportConfig) -> Result<Self> {
        let tiberius_config = tiberius_config(config);

        let tcp = TcpStream::connect(tiberius_config.get_addr())
            .await
            .map_err(|e| ExportError::connection_failed("Open connection failed", e))?;

        tcp.set_nodelay(true)
            .map_err(|e| ExportError::connection_failed("Open connection failed", e))?;

        let client = Client::connect(tiberius_config, tcp.compat_write())
            .await
            .map_err(|e| ExportError::connection_failed("Open connection failed", e))?;

        debug!("SQL Server login succeeded");
        Ok(Self { client })
    }
}

/// Builds the Tiberius configuration from the export configuration.
fn tiberius_config(config: &ExportConfig) -> Config {
    let mut tiberius_config = Config::new();
    tiberius_config.host(config.server());
    tiberius_config.port(config.port());
    tiberius_config.authentication(AuthMethod::sql_server(config.user(), config.password()));

    if !config.database().is_empty() {
        tiberius_config.database(config.database());
    }

    if config.trust_cert() {
        tiberius_config.trust_cert();
    }

    tiberius_config
}

#[async_trait]
impl Session for MssqlSession {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    async fn query<'a>(&'a mut self, sql: &str) -> Result<Box<dyn ResultCursor + 'a>> {
        let mut stream = self
            .client
            .simple_query(sql.to_owned())
            .await
            .map_err(|e| ExportError::query_failed("Prepare failed", e))?;

        let columns = stream
            .columns()
            .await
            .map_err(|e| ExportError::query_failed("Prepare failed", e))?
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Box::new(MssqlCursor {
            columns,
            rows: stream.into_row_stream(),
            exhausted: false,
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let session = *self;
        session
            .client
            .close()
            .await
            .map_err(|e| ExportError::connection_failed("Close connection failed", e))
    }
}

/// Cursor over the first result set of a batch.
struct MssqlCursor<'a> {
    columns: Vec<String>,
    rows: BoxStream<'a, tiberius::Result<Row>>,
    exhausted: bool,
}

#[async_trait]
impl<'a> ResultCursor for MssqlCursor<'a> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Vec<CellValue>>> {
        if self.exhausted {
            return Ok(None);
        }

        let next = self
            .rows
            .try_next()
            .await
            .map_err(|e| ExportError::query_failed("Scan failed", e))?;

        match next {
            // Rows of later result sets would change the record width
            Some(row) if row.result_index() == 0 => {
                Ok(Some(row.into_iter().map(cell_value).collect()))
            }
            Some(_) | None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

/// Maps a Tiberius column value onto a [`CellValue`].
fn cell_value(data: ColumnData<'static>) -> CellValue {
    match data {
        ColumnData::U8(Some(v)) => CellValue::Integer(i64::from(v)),
        ColumnData::I16(Some(v)) => CellValue::Integer(i64::from(v)),
        ColumnData::I32(Some(v)) => CellValue::Integer(i64::from(v)),
        ColumnData::I64(Some(v)) => CellValue::Integer(v),
        ColumnData::String(Some(s)) => CellValue::Text(s.into_owned()),
        ColumnData::Xml(Some(xml)) => CellValue::Text(xml.into_owned().into_string()),
        ColumnData::Binary(Some(b)) => CellValue::Bytes(b.into_owned()),
        ColumnData::Numeric(Some(n)) => {
            CellValue::Bytes(numeric_text(n.value(), n.scale()).into_bytes())
        }
        ColumnData::U8(None)
        | ColumnData::I16(None)
        | ColumnData::I32(None)
        | ColumnData::I64(None)
        | ColumnData::String(None)
        | ColumnData::Xml(None)
        | ColumnData::Binary(None)
        | ColumnData::Numeric(None) => CellValue::Null,
        other => unsupported(&other),
    }
}

/// Renders a scaled decimal as plain text: `-150` at scale 2 is `-1.50`,
/// `5` at scale 0 is `5`.
fn numeric_text(value: i128, scale: u8) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();
    let scale = usize::from(scale);

    if scale == 0 {
        return format!("{sign}{digits}");
    }

    let padded = format!("{digits:0>width$}", width = scale.saturating_add(1));
    let (whole, fraction) = padded.split_at(padded.len().saturating_sub(scale));
    format!("{sign}{whole}.{fraction}")
}

/// Values without a string conversion; `NULL`s of these types are still `Null`.
fn unsupported(data: &ColumnData<'_>) -> CellValue {
    let (type_name, is_null) = match data {
        ColumnData::Bit(v) => ("bit", v.is_none()),
        ColumnData::F32(v) => ("real", v.is_none()),
        ColumnData::F64(v) => ("float", v.is_none()),
        ColumnData::Guid(v) => ("uniqueidentifier", v.is_none()),
        ColumnData::DateTime(v) => ("datetime", v.is_none()),
        ColumnData::SmallDateTime(v) => ("smalldatetime", v.is_none()),
        ColumnData::Time(v) => ("time", v.is_none()),
        ColumnData::Date(v) => ("date", v.is_none()),
        ColumnData::DateTime2(v) => ("datetime2", v.is_none()),
        ColumnData::DateTimeOffset(v) => ("datetimeoffset", v.is_none()),
        #[allow(unreachable_patterns)]
        _ => return CellValue::Unrecognized { type_name: None },
    };

    if is_null {
        CellValue::Null
    } else {
        CellValue::unrecognized(type_name)
    }
}
