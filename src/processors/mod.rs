pub mod ingest;
pub mod normalizer;
pub mod table_loader;

pub use ingest::{ingest, load_source};
pub use normalizer::{parse_datetime, ChunkNormalizer};
pub use table_loader::{LoadSummary, LoaderState, TableLoader};
