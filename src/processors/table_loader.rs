use crate::config::LoadConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, TableSchema};
use crate::processors::normalizer::ChunkNormalizer;
use crate::writers::TableSink;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Lifecycle of one load: `Start -> SchemaCreated -> (append)* -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Start,
    SchemaCreated,
    Done,
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderState::Start => write!(f, "START"),
            LoaderState::SchemaCreated => write!(f, "SCHEMA_CREATED"),
            LoaderState::Done => write!(f, "DONE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub table_name: String,
    pub chunks_loaded: usize,
    pub rows_loaded: u64,
    pub elapsed: Duration,
}

impl LoadSummary {
    pub fn summary(&self) -> String {
        format!(
            "Table: {}\nChunks: {}\nRows: {}\nElapsed: {:.3} seconds",
            self.table_name,
            self.chunks_loaded,
            self.rows_loaded,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Creates the target table from the first chunk and appends every chunk to it.
pub struct TableLoader<S: TableSink> {
    sink: S,
    table_name: String,
    pickup_column: String,
    dropoff_column: String,
    state: LoaderState,
    schema: Option<TableSchema>,
    chunks_loaded: usize,
    rows_loaded: u64,
    started: Instant,
}

impl<S: TableSink> TableLoader<S> {
    pub fn new(sink: S, config: &LoadConfig) -> Self {
        Self {
            sink,
            table_name: config.table_name.clone(),
            pickup_column: config.pickup_column.clone(),
            dropoff_column: config.dropoff_column.clone(),
            state: LoaderState::Start,
            schema: None,
            chunks_loaded: 0,
            rows_loaded: 0,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Create the target table from the first chunk's columns, with zero rows.
    /// Replaces any existing table of the same name. Allowed once.
    pub fn initialize_schema(&mut self, first_chunk: &Chunk) -> Result<&TableSchema> {
        if self.state != LoaderState::Start {
            return Err(ProcessingError::InvalidState(format!(
                "schema for '{}' already initialized (state {})",
                self.table_name, self.state
            )));
        }

        for column in [&self.pickup_column, &self.dropoff_column] {
            if first_chunk.column_position(column).is_none() {
                return Err(ProcessingError::MissingColumn(column.clone()));
            }
        }

        let schema = TableSchema::infer_from_chunk(
            first_chunk,
            &[self.pickup_column.as_str(), self.dropoff_column.as_str()],
        );
        debug!("Inferred schema for {}: {}", self.table_name, schema.summary());

        self.sink.replace_table(&self.table_name, &schema)?;
        info!(
            "Created table {} with {} columns",
            self.table_name,
            schema.columns().len()
        );

        self.state = LoaderState::SchemaCreated;
        let schema = self.schema.insert(schema);
        Ok(&*schema)
    }

    /// Normalize the datetime columns of a chunk and append its rows in order
    pub fn append(&mut self, chunk: &Chunk) -> Result<u64> {
        match self.state {
            LoaderState::SchemaCreated => {}
            LoaderState::Start => {
                return Err(ProcessingError::InvalidState(format!(
                    "append to '{}' before its schema was initialized",
                    self.table_name
                )))
            }
            LoaderState::Done => {
                return Err(ProcessingError::InvalidState(format!(
                    "append to '{}' after the load finished",
                    self.table_name
                )))
            }
        }

        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| ProcessingError::InvalidState("schema missing".to_string()))?;

        if !schema.matches_headers(chunk.headers()) {
            return Err(ProcessingError::SchemaMismatch {
                table: self.table_name.clone(),
                expected: schema.source_column_names(),
                found: chunk.headers().to_vec(),
            });
        }

        let rows = ChunkNormalizer::new(schema).normalize(chunk)?;
        let written = self.sink.append_rows(&self.table_name, schema, &rows)?;

        self.chunks_loaded += 1;
        self.rows_loaded += written;
        debug!(
            "Appended {} rows to {} ({} total)",
            written, self.table_name, self.rows_loaded
        );

        Ok(written)
    }

    /// Create the table from the first chunk and append that chunk's rows
    pub fn load_first(&mut self, first_chunk: &Chunk) -> Result<u64> {
        self.initialize_schema(first_chunk)?;
        self.append(first_chunk)
    }

    /// Mark the load as complete once the chunk sequence is exhausted
    pub fn finish(&mut self) -> Result<LoadSummary> {
        if self.state != LoaderState::SchemaCreated {
            return Err(ProcessingError::InvalidState(format!(
                "cannot finish load of '{}' from state {}",
                self.table_name, self.state
            )));
        }
        self.state = LoaderState::Done;

        Ok(LoadSummary {
            table_name: self.table_name.clone(),
            chunks_loaded: self.chunks_loaded,
            rows_loaded: self.rows_loaded,
            elapsed: self.started.elapsed(),
        })
    }
}
