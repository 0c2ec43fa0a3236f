use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("Invalid datetime in column '{column}' at row {row}: '{value}'")]
    DateParse {
        column: String,
        row: u64,
        value: String,
    },

    #[error("Value '{value}' in column '{column}' at row {row} is not a valid {expected}")]
    ValueCoercion {
        column: String,
        row: u64,
        value: String,
        expected: &'static str,
    },

    #[error("Schema mismatch for table '{table}': expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Source file {0} contains no data rows")]
    EmptySource(PathBuf),

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Invalid loader state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
