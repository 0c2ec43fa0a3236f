use crate::error::Result;
use crate::models::{TableSchema, Value};

/// Destination for loaded rows.
///
/// Implementations own the connection (or storage) and are used serially.
/// `rows` passed to `append_rows` are already typed to `schema`, row index
/// first.
pub trait TableSink {
    /// Create `table` with zero rows, dropping any table of the same name
    fn replace_table(&mut self, table: &str, schema: &TableSchema) -> Result<()>;

    /// Append rows in order, all-or-nothing. Returns the number of rows written.
    fn append_rows(&mut self, table: &str, schema: &TableSchema, rows: &[Vec<Value>]) -> Result<u64>;
}

impl<S: TableSink + ?Sized> TableSink for &mut S {
    fn replace_table(&mut self, table: &str, schema: &TableSchema) -> Result<()> {
        (**self).replace_table(table, schema)
    }

    fn append_rows(&mut self, table: &str, schema: &TableSchema, rows: &[Vec<Value>]) -> Result<u64> {
        (**self).append_rows(table, schema, rows)
    }
}

/// Double-quote an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
