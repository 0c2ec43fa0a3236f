use crate::error::{ProcessingError, Result};
use crate::models::schema::parse_bool;
use crate::models::{Chunk, ColumnType, TableSchema, Value};
use crate::utils::constants::{is_null_token, DATETIME_FORMATS, DATE_FORMATS};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a datetime in any of the accepted layouts.
///
/// Values carrying a UTC offset are converted to UTC and stored naive.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Converts the raw text of a chunk into typed rows matching a table schema.
///
/// TIMESTAMP columns go through [`parse_datetime`]; other columns are coerced
/// to the type fixed when the table was created. Null tokens become NULL in
/// every column. The first value that does not fit fails the whole chunk.
pub struct ChunkNormalizer<'a> {
    schema: &'a TableSchema,
}

impl<'a> ChunkNormalizer<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    pub fn normalize(&self, chunk: &Chunk) -> Result<Vec<Vec<Value>>> {
        let columns = self.schema.source_columns();
        let mut rows = Vec::with_capacity(chunk.len());

        for (offset, record) in chunk.rows().iter().enumerate() {
            let row_index = chunk.start_index() + offset as u64;
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(Value::Integer(row_index as i64));

            for (position, column) in columns.iter().enumerate() {
                let raw = record.get(position).unwrap_or("");
                row.push(coerce_value(raw, column.column_type, &column.name, row_index)?);
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

pub fn coerce_value(raw: &str, column_type: ColumnType, column: &str, row: u64) -> Result<Value> {
    if is_null_token(raw) {
        return Ok(Value::Null);
    }

    let trimmed = raw.trim();
    let coercion_error = || ProcessingError::ValueCoercion {
        column: column.to_string(),
        row,
        value: raw.to_string(),
        expected: column_type.sql_name(),
    };

    match column_type {
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::BigInt => parse_bigint(trimmed)
            .map(Value::Integer)
            .ok_or_else(coercion_error),
        ColumnType::Double => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| coercion_error()),
        ColumnType::Boolean => parse_bool(trimmed)
            .map(Value::Boolean)
            .ok_or_else(coercion_error),
        ColumnType::Timestamp => parse_datetime(trimmed).map(Value::Timestamp).ok_or_else(|| {
            ProcessingError::DateParse {
                column: column.to_string(),
                row,
                value: raw.to_string(),
            }
        }),
    }
}

/// Integers parse exactly. Other finite numbers are rounded half away from
/// zero, the way PostgreSQL casts numeric text into a `BIGINT` column.
fn parse_bigint(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }

    let rounded = value.parse::<f64>().ok()?.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < 9_223_372_036_854_775_808.0 {
        Some(rounded as i64)
    } else {
        None
    }
}
