use async_trait::async_trait;
use kbrag_core::error::Result;
use kbrag_core::models::{Chunk, ChunkId, Embedding, ScoredResult};

/// Port for vector storage and similarity search
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store embeddings
    async fn store_embeddings(&self, embeddings: &[Embedding]) -> Result<()>;

    /// Perform similarity search
    /// Returns the top k most similar embeddings to the query vector
    /// If threshold is provided, only returns results with similarity >= threshold
    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<ScoredResult>>;

    /// Get embedding by chunk ID
    async fn get_embedding(&self, chunk_id: ChunkId) -> Result<Option<Embedding>>;

    /// Delete embeddings by chunk IDs
    async fn delete_embeddings(&self, chunk_ids: &[ChunkId]) -> Result<()>;

    /// Number of stored vectors
    async fn len(&self) -> Result<usize>;

    /// Get the dimensionality of stored vectors
    async fn dimensions(&self) -> Result<usize>;
}

/// Port for chunk storage
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Store text chunks
    async fn store_chunks(&self, chunks: &[Chunk]) -> Result<()>;

    /// Retrieve chunks by IDs
    async fn get_chunks(&self, ids: &[ChunkId]) -> Result<Vec<Chunk>>;

    /// Get a single chunk by ID
    async fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>>;

    /// Delete chunks by IDs
    async fn delete_chunks(&self, ids: &[ChunkId]) -> Result<()>;

    /// List all chunk IDs
    async fn list_chunk_ids(&self) -> Result<Vec<ChunkId>>;
}
