pub mod memory_sink;
pub mod postgres_sink;
pub mod table_sink;

pub use memory_sink::{MemoryDatabase, MemoryTable};
pub use postgres_sink::PostgresSink;
pub use table_sink::{quote_identifier, TableSink};
