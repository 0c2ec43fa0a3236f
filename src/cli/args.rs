use crate::config::{ConnectionParams, FetchConfig, LoadConfig};
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_DROPOFF_COLUMN, DEFAULT_PICKUP_COLUMN};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "taxi-ingest")]
#[command(about = "Ingest CSV data to PostgreSQL")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "user name for PostgreSQL")]
    pub user: String,

    #[arg(long, help = "password for PostgreSQL")]
    pub password: String,

    #[arg(long, help = "host for PostgreSQL")]
    pub host: String,

    #[arg(long, help = "port for PostgreSQL")]
    pub port: u16,

    #[arg(long, help = "database name for PostgreSQL")]
    pub db: String,

    #[arg(long = "table_name", help = "name of the table where results will be written")]
    pub table_name: String,

    #[arg(long, help = "URL of the CSV file")]
    pub url: String,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "rows per chunk")]
    pub chunk_size: usize,

    #[arg(long, default_value = DEFAULT_PICKUP_COLUMN)]
    pub pickup_column: String,

    #[arg(long, default_value = DEFAULT_DROPOFF_COLUMN)]
    pub dropoff_column: String,

    #[arg(long, default_value = ".", help = "directory for the downloaded file")]
    pub output_dir: PathBuf,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
            db: self.db.clone(),
        }
    }

    pub fn load_config(&self) -> LoadConfig {
        LoadConfig::new(self.table_name.clone())
            .with_chunk_size(self.chunk_size)
            .with_datetime_columns(self.pickup_column.clone(), self.dropoff_column.clone())
            .with_fetch(FetchConfig::default().with_output_dir(self.output_dir.clone()))
    }
}
