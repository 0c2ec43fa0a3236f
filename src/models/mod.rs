pub mod chunk;
pub mod schema;
pub mod source;
pub mod value;

pub use chunk::Chunk;
pub use schema::{ColumnDef, ColumnType, TableSchema};
pub use source::{Compression, SourceFile};
pub use value::Value;
