use kbrag_core::error::Result;
use kbrag_core::models::{Chunk, Embedding};
use kbrag_llm::ports::Embedder;

/// Pipeline for generating embeddings from text chunks
pub struct EmbeddingPipeline<E: Embedder> {
    embedder: E,
    batch_size: usize,
}

impl<E: Embedder> EmbeddingPipeline<E> {
    /// Create a new embedding pipeline with the specified embedder and batch size
    pub fn new(embedder: E, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Get the embedder's model name
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Get the embedding dimension
    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// Borrow the underlying embedder
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Consume the pipeline, returning the embedder
    pub fn into_embedder(self) -> E {
        self.embedder
    }

    /// Generate embeddings for all chunks with progress callback
    pub async fn generate_embeddings<F>(
        &self,
        chunks: &[Chunk],
        mut progress: F,
    ) -> Result<Vec<Embedding>>
    where
        F: FnMut(usize, usize),
    {
        let total = chunks.len();
        let mut all_embeddings = Vec::with_capacity(total);

        // Process chunks in batches
        for chunk_batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = chunk_batch.iter().map(|c| c.content.as_str()).collect();

            let vectors = self.embedder.embed(&texts).await?;

            for (chunk, vector) in chunk_batch.iter().zip(vectors.into_iter()) {
                all_embeddings.push(Embedding {
                    chunk_id: chunk.id,
                    vector,
                });
            }

            progress(all_embeddings.len(), total);
        }

        Ok(all_embeddings)
    }
}
