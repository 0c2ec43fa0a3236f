use crate::config::ConnectionParams;
use crate::error::Result;
use crate::models::{TableSchema, Value};
use crate::writers::table_sink::{quote_identifier, TableSink};
use postgres::binary_copy::BinaryCopyInWriter;
use postgres::types::{ToSql, Type};
use postgres::{Client, NoTls};
use tracing::debug;

/// Writes to PostgreSQL over a single blocking connection.
///
/// Table replacement and each append run in their own transaction, so a
/// failed append leaves no rows of that chunk behind.
pub struct PostgresSink {
    client: Client,
}

impl PostgresSink {
    pub fn connect(params: &ConnectionParams) -> Result<Self> {
        debug!(
            "Connecting to postgres at {}:{}/{} as {}",
            params.host, params.port, params.db, params.user
        );
        let client = params.to_pg_config().connect(NoTls)?;
        Ok(Self { client })
    }

    pub fn create_table_sql(table: &str, schema: &TableSchema) -> String {
        let columns = schema
            .columns()
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type.sql_name()))
            .collect::<Vec<_>>()
            .join(", ");

        format!("CREATE TABLE {} ({})", quote_identifier(table), columns)
    }

    pub fn create_index_sql(table: &str, schema: &TableSchema) -> Option<String> {
        let index_column = schema.columns().first()?;
        Some(format!(
            "CREATE INDEX {} ON {} ({})",
            quote_identifier(&format!("ix_{}_{}", table, index_column.name)),
            quote_identifier(table),
            quote_identifier(&index_column.name)
        ))
    }

    pub fn copy_sql(table: &str, schema: &TableSchema) -> String {
        let columns = schema
            .columns()
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "COPY {} ({}) FROM STDIN (FORMAT binary)",
            quote_identifier(table),
            columns
        )
    }
}

impl TableSink for PostgresSink {
    fn replace_table(&mut self, table: &str, schema: &TableSchema) -> Result<()> {
        let mut statements = vec![
            format!("DROP TABLE IF EXISTS {}", quote_identifier(table)),
            Self::create_table_sql(table, schema),
        ];
        statements.extend(Self::create_index_sql(table, schema));

        let sql = statements.join(";\n");
        debug!("Replacing table {}:\n{}", table, sql);

        let mut tx = self.client.transaction()?;
        tx.batch_execute(&sql)?;
        tx.commit()?;
        Ok(())
    }

    fn append_rows(&mut self, table: &str, schema: &TableSchema, rows: &[Vec<Value>]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let types: Vec<Type> = schema
            .columns()
            .iter()
            .map(|c| c.column_type.pg_type())
            .collect();

        let copy_sql = Self::copy_sql(table, schema);
        let mut tx = self.client.transaction()?;
        let copy = tx.copy_in(copy_sql.as_str())?;
        let mut writer = BinaryCopyInWriter::new(copy, &types);

        for row in rows {
            let params: Vec<&(dyn ToSql + Sync)> =
                row.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
            writer.write(&params)?;
        }

        let written = writer.finish()?;
        tx.commit()?;

        debug!("Copied {} rows into {}", written, table);
        Ok(written)
    }
}
