use crate::models::Chunk;
use crate::utils::constants::{is_null_token, INDEX_COLUMN};
use postgres::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Text,
    Timestamp,
}

impl ColumnType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
            ColumnType::Timestamp => "TIMESTAMP WITHOUT TIME ZONE",
        }
    }

    pub fn pg_type(&self) -> Type {
        match self {
            ColumnType::BigInt => Type::INT8,
            ColumnType::Double => Type::FLOAT8,
            ColumnType::Boolean => Type::BOOL,
            ColumnType::Text => Type::TEXT,
            ColumnType::Timestamp => Type::TIMESTAMP,
        }
    }

    /// Infer the narrowest type that holds every non-null value.
    /// Columns with no non-null values fall back to TEXT.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;
        let mut seen = false;

        for raw in values {
            if is_null_token(raw) {
                continue;
            }
            seen = true;
            let value = raw.trim();

            if all_int && value.parse::<i64>().is_err() {
                all_int = false;
            }
            if all_float && value.parse::<f64>().is_err() {
                all_float = false;
            }
            if all_bool && parse_bool(value).is_none() {
                all_bool = false;
            }
            if !all_int && !all_float && !all_bool {
                return ColumnType::Text;
            }
        }

        match (seen, all_int, all_float, all_bool) {
            (false, ..) => ColumnType::Text,
            (true, true, _, _) => ColumnType::BigInt,
            (true, false, true, _) => ColumnType::Double,
            (true, false, false, true) => ColumnType::Boolean,
            _ => ColumnType::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Shape of the target table: the implicit row-index column followed by the
/// source columns in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Derive the schema from the first chunk. Columns named in
    /// `timestamp_columns` are always TIMESTAMP; the rest are inferred.
    pub fn infer_from_chunk(chunk: &Chunk, timestamp_columns: &[&str]) -> Self {
        let mut columns = Vec::with_capacity(chunk.headers().len() + 1);
        columns.push(ColumnDef::new(INDEX_COLUMN, ColumnType::BigInt));

        for (position, name) in chunk.headers().iter().enumerate() {
            let column_type = if timestamp_columns.contains(&name.as_str()) {
                ColumnType::Timestamp
            } else {
                ColumnType::infer(chunk.column_values(position))
            };
            columns.push(ColumnDef::new(name.clone(), column_type));
        }

        Self { columns }
    }

    pub fn from_columns(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// All columns, row index first
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Source columns only, without the row index
    pub fn source_columns(&self) -> &[ColumnDef] {
        self.columns.get(1..).unwrap_or(&[])
    }

    pub fn source_column_names(&self) -> Vec<String> {
        self.source_columns().iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    pub fn matches_headers(&self, headers: &[String]) -> bool {
        let source = self.source_columns();
        source.len() == headers.len() && source.iter().zip(headers).all(|(c, h)| &c.name == h)
    }

    pub fn summary(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.column_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
