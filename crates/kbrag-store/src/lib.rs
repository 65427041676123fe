//! kbrag-store - Chunk and vector storage
//!
//! In-memory stores backing similarity search, plus on-disk index
//! persistence so a built index can be reloaded without re-embedding.

pub mod disk;
pub mod memory;
pub mod ports;

pub use disk::{index_exists, load_index, load_state, save_index, IndexSnapshot};
pub use memory::{MemoryChunkStore, MemoryVectorStore};
pub use ports::{ChunkStore, VectorStore};
