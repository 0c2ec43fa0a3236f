use crate::error::{ProcessingError, Result};
use crate::models::{ColumnType, TableSchema, Value};
use crate::writers::table_sink::TableSink;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub schema: TableSchema,
    pub rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.schema.columns().iter().position(|c| c.name == name)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }
}

/// In-process table store with the same replace/append contract as the
/// PostgreSQL sink. Appends are checked against the stored schema and
/// column types before any row is kept.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: BTreeMap<String, MemoryTable>,
    appends: usize,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Number of non-empty append calls received
    pub fn append_count(&self) -> usize {
        self.appends
    }
}

fn value_fits(value: &Value, column_type: ColumnType) -> bool {
    matches!(
        (value, column_type),
        (Value::Null, _)
            | (Value::Integer(_), ColumnType::BigInt)
            | (Value::Float(_), ColumnType::Double)
            | (Value::Boolean(_), ColumnType::Boolean)
            | (Value::Text(_), ColumnType::Text)
            | (Value::Timestamp(_), ColumnType::Timestamp)
    )
}

impl TableSink for MemoryDatabase {
    fn replace_table(&mut self, table: &str, schema: &TableSchema) -> Result<()> {
        self.tables.insert(
            table.to_string(),
            MemoryTable {
                schema: schema.clone(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn append_rows(&mut self, table: &str, schema: &TableSchema, rows: &[Vec<Value>]) -> Result<u64> {
        let stored = self
            .tables
            .get_mut(table)
            .ok_or_else(|| ProcessingError::TableNotFound(table.to_string()))?;

        if stored.schema.column_names() != schema.column_names() {
            return Err(ProcessingError::SchemaMismatch {
                table: table.to_string(),
                expected: stored.schema.column_names(),
                found: schema.column_names(),
            });
        }

        let columns = stored.schema.columns();
        for row in rows {
            if row.len() != columns.len() {
                return Err(ProcessingError::SchemaMismatch {
                    table: table.to_string(),
                    expected: stored.schema.column_names(),
                    found: vec![format!("<{} values>", row.len())],
                });
            }
            if let Some((value, column)) = row
                .iter()
                .zip(columns)
                .find(|(value, column)| !value_fits(value, column.column_type))
            {
                return Err(ProcessingError::ValueCoercion {
                    column: column.name.clone(),
                    row: row
                        .first()
                        .and_then(Value::as_integer)
                        .map(|i| i as u64)
                        .unwrap_or_default(),
                    value: value.to_string(),
                    expected: column.column_type.sql_name(),
                });
            }
        }

        if !rows.is_empty() {
            self.appends += 1;
        }
        stored.rows.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }
}
