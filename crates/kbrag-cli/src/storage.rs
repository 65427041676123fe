use anyhow::Result;
use kbrag_core::models::IndexState;
use kbrag_store::memory::{MemoryChunkStore, MemoryVectorStore};
use kbrag_store::ports::{ChunkStore, VectorStore};
use std::path::Path;
use std::sync::Arc;

/// In-memory stores hydrated from a saved index
pub struct Storage {
    pub vector: Arc<dyn VectorStore>,
    pub chunks: Arc<dyn ChunkStore>,
    pub state: IndexState,
}

impl Storage {
    /// Create empty stores for a fresh build
    pub fn empty() -> (Arc<dyn VectorStore>, Arc<dyn ChunkStore>) {
        (
            Arc::new(MemoryVectorStore::new()),
            Arc::new(MemoryChunkStore::new()),
        )
    }

    /// Load a saved index from disk into in-memory stores
    pub async fn load(index_dir: impl AsRef<Path>) -> Result<Self> {
        let snapshot = kbrag_store::load_index(index_dir)?;

        let vector = MemoryVectorStore::new();
        let chunks = MemoryChunkStore::new();

        chunks.store_chunks(&snapshot.chunks).await?;
        vector.store_embeddings(&snapshot.embeddings).await?;

        Ok(Self {
            vector: Arc::new(vector),
            chunks: Arc::new(chunks),
            state: snapshot.state,
        })
    }
}
