use crate::embedding::EmbeddingPipeline;
use chrono::Utc;
use kbrag_core::error::Result;
use kbrag_core::models::{Chunk, Embedding, IndexState};
use kbrag_llm::ports::Embedder;
use kbrag_store::ports::{ChunkStore, VectorStore};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Progress information for index building
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of index building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    Initializing,
    GeneratingEmbeddings,
    StoringData,
    Finalizing,
}

/// Index builder: embeds chunks, stores them, and produces a
/// deterministic index state.
pub struct IndexBuilder<E>
where
    E: Embedder,
{
    vector_store: Arc<dyn VectorStore>,
    chunk_store: Arc<dyn ChunkStore>,
    embedding: EmbeddingPipeline<E>,
}

impl<E> IndexBuilder<E>
where
    E: Embedder,
{
    /// Create a new index builder
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        chunk_store: Arc<dyn ChunkStore>,
        embedder: E,
    ) -> Self {
        Self {
            vector_store,
            chunk_store,
            embedding: EmbeddingPipeline::new(embedder, 32),
        }
    }

    /// Set the batch size for embedding generation
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        let embedder = self.embedding.into_embedder();
        self.embedding = EmbeddingPipeline::new(embedder, batch_size);
        self
    }

    /// Build the index from chunks
    pub async fn build(&self, chunks: &[Chunk]) -> Result<IndexBuildResult> {
        self.build_with_progress(chunks, |_| {}).await
    }

    /// Build the index with progress reporting.
    ///
    /// Replaces any previously stored chunks and embeddings.
    pub async fn build_with_progress<F>(
        &self,
        chunks: &[Chunk],
        mut progress: F,
    ) -> Result<IndexBuildResult>
    where
        F: FnMut(IndexProgress),
    {
        let mut result = IndexBuildResult::default();

        // Phase 1: Clear any existing data
        progress(IndexProgress {
            phase: IndexPhase::Initializing,
            current: 0,
            total: 1,
            message: "Clearing existing index data".to_string(),
        });

        let existing = self.chunk_store.list_chunk_ids().await?;
        if !existing.is_empty() {
            self.vector_store.delete_embeddings(&existing).await?;
            self.chunk_store.delete_chunks(&existing).await?;
        }

        result.chunk_count = chunks.len();

        // Phase 2: Generate embeddings
        let total = chunks.len();
        let embeddings = self
            .embedding
            .generate_embeddings(chunks, |done, _| {
                progress(IndexProgress {
                    phase: IndexPhase::GeneratingEmbeddings,
                    current: done,
                    total,
                    message: format!("Generated {}/{} embeddings", done, total),
                });
            })
            .await?;
        result.embedding_dim = self.embedding.dimensions();

        // Phase 3: Store chunks and embeddings
        progress(IndexProgress {
            phase: IndexPhase::StoringData,
            current: 0,
            total: 2,
            message: "Storing chunks".to_string(),
        });

        self.chunk_store.store_chunks(chunks).await?;

        progress(IndexProgress {
            phase: IndexPhase::StoringData,
            current: 1,
            total: 2,
            message: "Storing embeddings".to_string(),
        });

        self.vector_store.store_embeddings(&embeddings).await?;

        // Phase 4: Generate hash
        progress(IndexProgress {
            phase: IndexPhase::Finalizing,
            current: 0,
            total: 1,
            message: "Generating index hash".to_string(),
        });

        result.index_hash = self.generate_index_hash(chunks, &embeddings);
        result.embeddings = embeddings;

        Ok(result)
    }

    /// Generate deterministic index hash
    fn generate_index_hash(&self, chunks: &[Chunk], embeddings: &[Embedding]) -> String {
        let mut hasher = DefaultHasher::new();

        let mut sorted_chunks = chunks.to_vec();
        sorted_chunks.sort_by_key(|c| c.id);

        for chunk in &sorted_chunks {
            chunk.id.0.hash(&mut hasher);
            chunk.content.hash(&mut hasher);
            chunk.source.document.hash(&mut hasher);
        }

        let mut sorted_embeddings = embeddings.to_vec();
        sorted_embeddings.sort_by_key(|e| e.chunk_id);

        for embedding in &sorted_embeddings {
            embedding.chunk_id.0.hash(&mut hasher);
            for &val in &embedding.vector {
                val.to_bits().hash(&mut hasher);
            }
        }

        self.embedding.model_name().hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }

    /// Create an IndexState from build results
    pub fn create_index_state(&self, result: &IndexBuildResult) -> IndexState {
        IndexState {
            hash: result.index_hash.clone(),
            built_at: Utc::now(),
            embedder: self.embedding.model_name().to_string(),
            chunk_count: result.chunk_count,
            embedding_dim: result.embedding_dim,
        }
    }
}

/// Result of an index build operation
#[derive(Debug, Clone, Default)]
pub struct IndexBuildResult {
    /// Total number of chunks indexed
    pub chunk_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,

    /// Deterministic index hash
    pub index_hash: String,

    /// The generated embeddings, for persistence alongside the chunks
    pub embeddings: Vec<Embedding>,
}
