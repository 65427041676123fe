//! Domain models

pub mod chunk;
pub mod document;
pub mod index;

pub use chunk::{Chunk, ChunkId, ChunkSource, Embedding};
pub use document::{DocMetadata, Document, DocumentStats};
pub use index::{IndexState, ScoredResult};
