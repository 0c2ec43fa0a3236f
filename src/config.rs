use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_DROPOFF_COLUMN, DEFAULT_PICKUP_COLUMN, GZIP_OUTPUT_FILE,
    PLAIN_OUTPUT_FILE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use validator::Validate;

/// Where the fetcher writes downloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FetchConfig {
    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub plain_file_name: String,

    #[validate(length(min = 1))]
    pub gzip_file_name: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            plain_file_name: PLAIN_OUTPUT_FILE.to_string(),
            gzip_file_name: GZIP_OUTPUT_FILE.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Settings for one ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoadConfig {
    #[validate(length(min = 1))]
    pub table_name: String,

    #[validate(range(min = 1))]
    pub chunk_size: usize,

    #[validate(length(min = 1))]
    pub pickup_column: String,

    #[validate(length(min = 1))]
    pub dropoff_column: String,

    #[validate(nested)]
    pub fetch: FetchConfig,
}

impl LoadConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            pickup_column: DEFAULT_PICKUP_COLUMN.to_string(),
            dropoff_column: DEFAULT_DROPOFF_COLUMN.to_string(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_datetime_columns(
        mut self,
        pickup_column: impl Into<String>,
        dropoff_column: impl Into<String>,
    ) -> Self {
        self.pickup_column = pickup_column.into();
        self.dropoff_column = dropoff_column.into();
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Validate and return self, for use at the end of a builder chain
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn datetime_columns(&self) -> [&str; 2] {
        [&self.pickup_column, &self.dropoff_column]
    }
}

/// PostgreSQL connection settings
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionParams {
    #[validate(length(min = 1))]
    pub user: String,

    pub password: String,

    #[validate(length(min = 1))]
    pub host: String,

    pub port: u16,

    #[validate(length(min = 1))]
    pub db: String,
}

impl ConnectionParams {
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .user(&self.user)
            .password(&self.password)
            .host(&self.host)
            .port(self.port)
            .dbname(&self.db);
        config
    }
}

// Keep the password out of logs and error output
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("user", &self.user)
            .field("password", &"********")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .finish()
    }
}
