//! In-memory storage implementations.
//!
//! Lock poisoning is treated as fatal: a poisoned `RwLock` means another
//! thread panicked while holding it, so these stores `unwrap()` lock guards.

use async_trait::async_trait;
use kbrag_core::error::Result;
use kbrag_core::models::{Chunk, ChunkId, Embedding, ScoredResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{ChunkStore, VectorStore};

/// In-memory implementation of VectorStore
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    embeddings: Arc<RwLock<HashMap<ChunkId, Embedding>>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn store_embeddings(&self, embeddings: &[Embedding]) -> Result<()> {
        let mut store = self.embeddings.write().unwrap();
        for embedding in embeddings {
            store.insert(embedding.chunk_id, embedding.clone());
        }
        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<ScoredResult>> {
        let embeddings = self.embeddings.read().unwrap();

        let mut results: Vec<ScoredResult> = embeddings
            .values()
            .map(|embedding| ScoredResult {
                chunk_id: embedding.chunk_id,
                score: Self::cosine_similarity(query, &embedding.vector),
            })
            .collect();

        // Apply threshold filtering if specified
        if let Some(threshold) = threshold {
            results.retain(|r| r.score >= threshold);
        }

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        // Take top k
        results.truncate(k);

        Ok(results)
    }

    async fn get_embedding(&self, chunk_id: ChunkId) -> Result<Option<Embedding>> {
        let embeddings = self.embeddings.read().unwrap();
        Ok(embeddings.get(&chunk_id).cloned())
    }

    async fn delete_embeddings(&self, chunk_ids: &[ChunkId]) -> Result<()> {
        let mut embeddings = self.embeddings.write().unwrap();
        for chunk_id in chunk_ids {
            embeddings.remove(chunk_id);
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.embeddings.read().unwrap().len())
    }

    async fn dimensions(&self) -> Result<usize> {
        let embeddings = self.embeddings.read().unwrap();
        Ok(embeddings.values().next().map(|e| e.vector.len()).unwrap_or(0))
    }
}

/// In-memory implementation of ChunkStore
#[derive(Debug, Clone, Default)]
pub struct MemoryChunkStore {
    chunks: Arc<RwLock<HashMap<ChunkId, Chunk>>>,
}

impl MemoryChunkStore {
    /// Create a new in-memory chunk store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn store_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        let mut store = self.chunks.write().unwrap();
        for chunk in chunks {
            store.insert(chunk.id, chunk.clone());
        }
        Ok(())
    }

    async fn get_chunks(&self, ids: &[ChunkId]) -> Result<Vec<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(ids.iter().filter_map(|id| chunks.get(id).cloned()).collect())
    }

    async fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.get(&id).cloned())
    }

    async fn delete_chunks(&self, ids: &[ChunkId]) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();
        for id in ids {
            chunks.remove(id);
        }
        Ok(())
    }

    async fn list_chunk_ids(&self) -> Result<Vec<ChunkId>> {
        let chunks = self.chunks.read().unwrap();
        let mut ids: Vec<ChunkId> = chunks.keys().copied().collect();
        // Stable order so callers see deterministic listings
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbrag_core::models::{ChunkSource, DocMetadata};

    fn embedding(id: u64, vector: Vec<f32>) -> Embedding {
        Embedding {
            chunk_id: ChunkId(id),
            vector,
        }
    }

    fn chunk(id: u64, content: &str) -> Chunk {
        Chunk {
            id: ChunkId(id),
            content: content.to_string(),
            source: ChunkSource {
                document: "test.txt".to_string(),
                seq: id,
                offset: 0,
            },
            metadata: DocMetadata::default(),
        }
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = MemoryVectorStore::cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let sim = MemoryVectorStore::cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(MemoryVectorStore::cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(MemoryVectorStore::cosine_similarity(&a, &b), 0.0);
    }

    #[tokio::test]
    async fn test_similarity_search_orders_by_score() {
        let store = MemoryVectorStore::new();
        store
            .store_embeddings(&[
                embedding(1, vec![1.0, 0.0]),
                embedding(2, vec![0.0, 1.0]),
                embedding(3, vec![0.7, 0.7]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 3, None).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk_id, ChunkId(1));
        assert_eq!(results[1].chunk_id, ChunkId(3));
        assert_eq!(results[2].chunk_id, ChunkId(2));
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_similarity_search_truncates_to_k() {
        let store = MemoryVectorStore::new();
        store
            .store_embeddings(&[
                embedding(1, vec![1.0, 0.0]),
                embedding(2, vec![0.9, 0.1]),
                embedding(3, vec![0.8, 0.2]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_similarity_search_applies_threshold() {
        let store = MemoryVectorStore::new();
        store
            .store_embeddings(&[
                embedding(1, vec![1.0, 0.0]),
                embedding(2, vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 10, Some(0.5)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk_id, ChunkId(1));
    }

    #[tokio::test]
    async fn test_delete_embeddings() {
        let store = MemoryVectorStore::new();
        store.store_embeddings(&[embedding(1, vec![1.0])]).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        store.delete_embeddings(&[ChunkId(1)]).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
        assert!(store.get_embedding(ChunkId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dimensions() {
        let store = MemoryVectorStore::new();
        assert_eq!(store.dimensions().await.unwrap(), 0);

        store.store_embeddings(&[embedding(1, vec![0.0; 768])]).await.unwrap();
        assert_eq!(store.dimensions().await.unwrap(), 768);
    }

    #[tokio::test]
    async fn test_chunk_store_roundtrip() {
        let store = MemoryChunkStore::new();
        store.store_chunks(&[chunk(1, "first"), chunk(2, "second")]).await.unwrap();

        let fetched = store.get_chunk(ChunkId(1)).await.unwrap().unwrap();
        assert_eq!(fetched.content, "first");

        let ids = store.list_chunk_ids().await.unwrap();
        assert_eq!(ids, vec![ChunkId(1), ChunkId(2)]);

        store.delete_chunks(&[ChunkId(1)]).await.unwrap();
        assert!(store.get_chunk(ChunkId(1)).await.unwrap().is_none());
        assert_eq!(store.list_chunk_ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_chunks_skips_missing() {
        let store = MemoryChunkStore::new();
        store.store_chunks(&[chunk(1, "only")]).await.unwrap();

        let fetched = store.get_chunks(&[ChunkId(1), ChunkId(99)]).await.unwrap();
        assert_eq!(fetched.len(), 1);
    }
}
