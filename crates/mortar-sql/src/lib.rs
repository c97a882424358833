pub mod serializer;
pub use serializer::{CompiledQuery, Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;
