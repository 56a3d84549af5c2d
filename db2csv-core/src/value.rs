//! Database cell values and their conversion into CSV fields.
//!
//! Adapters translate driver values into [`CellValue`] at the database
//! boundary. Everything past that point is pure and testable without a
//! live database.

use crate::error::CoercionError;

/// A single cell read from a result cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// SQL `NULL`
    Null,
    /// Raw bytes, written out as text
    Bytes(Vec<u8>),
    /// Character data
    Text(String),
    /// Any integer column, widened to 64 bits
    Integer(i64),
    /// A value with no string conversion.
    ///
    /// `type_name` is `None` when the driver could not name the type.
    Unrecognized {
        /// SQL type name, when known
        type_name: Option<String>,
    },
}

impl CellValue {
    /// Shorthand for an unrecognized value of a named type.
    pub fn unrecognized(type_name: impl Into<String>) -> Self {
        Self::Unrecognized {
            type_name: Some(type_name.into()),
        }
    }

    /// Converts the value into its CSV field text.
    ///
    /// | value | field |
    /// |---|---|
    /// | `Null` | empty string |
    /// | `Bytes` | the bytes as UTF-8, invalid sequences replaced |
    /// | `Text` | unchanged |
    /// | `Integer` | base-10 digits |
    ///
    /// # Errors
    /// Returns [`CoercionError::UnknownType`] for a named unrecognized type
    /// and [`CoercionError::NilType`] when the type has no name.
    ///
    /// # Example
    /// ```rust
    /// use db2csv_core::CellValue;
    ///
    /// assert_eq!(CellValue::Integer(-42).into_field().unwrap(), "-42");
    /// assert_eq!(CellValue::Null.into_field().unwrap(), "");
    /// assert!(CellValue::unrecognized("bit").into_field().is_err());
    /// ```
    pub fn into_field(self) -> Result<String, CoercionError> {
        match self {
            Self::Null => Ok(String::new()),
            Self::Bytes(bytes) => Ok(String::from_utf8(bytes)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())),
            Self::Text(text) => Ok(text),
            Self::Integer(value) => Ok(value.to_string()),
            Self::Unrecognized {
                type_name: Some(name),
            } => Err(CoercionError::UnknownType(name)),
            Self::Unrecognized { type_name: None } => Err(CoercionError::NilType),
        }
    }
}

/// Converts a whole row into CSV fields, in column order.
///
/// The first failing value aborts the conversion; its column name is
/// returned alongside the error.
///
/// # Errors
/// Returns the name of the column and the coercion error of the first value
/// that cannot be converted.
pub fn coerce_row(
    row: Vec<CellValue>,
    columns: &[String],
) -> Result<Vec<String>, (String, CoercionError)> {
    row.into_iter()
        .enumerate()
        .map(|(index, value)| {
            value.into_field().map_err(|e| {
                let column = columns
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("#{index}"));
                (column, e)
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_empty() {
        assert_eq!(CellValue::Null.into_field().unwrap(), "");
    }

    #[test]
    fn test_bytes_are_text() {
        let value = CellValue::Bytes(b"12.50".to_vec());
        assert_eq!(value.into_field().unwrap(), "12.50");
    }

    #[test]
    fn test_invalid_utf8_bytes_are_replaced() {
        let value = CellValue::Bytes(vec![b'a', 0xff, b'b']);
        assert_eq!(value.into_field().unwrap(), "a\u{fffd}b");
    }

    #[test]
    fn test_text_is_verbatim() {
        let value = CellValue::Text("  O'Brien, \"Jr\"\n".to_string());
        assert_eq!(value.into_field().unwrap(), "  O'Brien, \"Jr\"\n");
    }

    #[test]
    fn test_integers() {
        assert_eq!(CellValue::Integer(-42).into_field().unwrap(), "-42");
        assert_eq!(CellValue::Integer(0).into_field().unwrap(), "0");
        assert_eq!(
            CellValue::Integer(i64::MIN).into_field().unwrap(),
            "-9223372036854775808"
        );
        assert_eq!(
            CellValue::Integer(i64::MAX).into_field().unwrap(),
            "9223372036854775807"
        );
    }

    #[test]
    fn test_unrecognized_types_fail() {
        assert_eq!(
            CellValue::unrecognized("datetime2").into_field(),
            Err(CoercionError::UnknownType("datetime2".to_string()))
        );
        assert_eq!(
            CellValue::Unrecognized { type_name: None }.into_field(),
            Err(CoercionError::NilType)
        );
    }

    #[test]
    fn test_coerce_row_keeps_column_order() {
        let columns = vec!["id".to_string(), "name".to_string(), "score".to_string()];
        let row = vec![
            CellValue::Integer(1),
            CellValue::Text("Alice".to_string()),
            CellValue::Null,
        ];
        assert_eq!(coerce_row(row, &columns).unwrap(), vec!["1", "Alice", ""]);
    }

    #[test]
    fn test_coerce_row_reports_failing_column() {
        let columns = vec!["id".to_string(), "active".to_string()];
        let row = vec![CellValue::Integer(1), CellValue::unrecognized("bit")];
        let (column, error) = coerce_row(row, &columns).unwrap_err();
        assert_eq!(column, "active");
        assert_eq!(error, CoercionError::UnknownType("bit".to_string()));
    }
}
