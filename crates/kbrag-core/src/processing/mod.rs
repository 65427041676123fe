//! Document loading and chunk splitting

pub mod loader;
pub mod splitter;

pub use loader::{parse_metadata, DocumentLoader};
pub use splitter::ChunkSplitter;
