use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChunkId;

/// Index build state, persisted alongside the index files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexState {
    /// Deterministic hash of the index contents
    pub hash: String,

    /// When the index was built
    pub built_at: DateTime<Utc>,

    /// Embedder model used for the index
    pub embedder: String,

    /// Number of chunks in the index
    pub chunk_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,
}

/// Scored similarity-search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Cosine similarity score
    pub score: f32,
}
