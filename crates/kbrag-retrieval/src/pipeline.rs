use kbrag_core::error::{KbragError, Result};
use kbrag_core::models::{Chunk, ChunkId, ScoredResult};
use kbrag_llm::ports::{Embedder, Generator};
use kbrag_store::ports::{ChunkStore, VectorStore};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{QueryExplanation, QueryPlan, QueryResult, RankingDetail, SourceReference};

/// Answer returned when retrieval finds nothing above the threshold
const NO_RESULTS_ANSWER: &str =
    "No relevant information found in the knowledge base for this question.";

/// Retrieval pipeline: embeds the question, retrieves the closest
/// chunks, and grounds the generated answer on them.
pub struct RetrievalPipeline<E, G>
where
    E: Embedder,
    G: Generator,
{
    vector_store: Arc<dyn VectorStore>,
    chunk_store: Arc<dyn ChunkStore>,
    embedder: E,
    generator: G,
}

impl<E, G> RetrievalPipeline<E, G>
where
    E: Embedder,
    G: Generator,
{
    /// Create a new retrieval pipeline
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        chunk_store: Arc<dyn ChunkStore>,
        embedder: E,
        generator: G,
    ) -> Self {
        Self {
            vector_store,
            chunk_store,
            embedder,
            generator,
        }
    }

    /// Execute a query plan
    pub async fn execute(&self, plan: &QueryPlan) -> Result<QueryResult> {
        let (sources, explanation) = self.retrieve(plan).await?;

        if sources.is_empty() {
            return Ok(QueryResult {
                question: plan.question.clone(),
                answer: NO_RESULTS_ANSWER.to_string(),
                sources,
                chunks_used: 0,
                explanation,
            });
        }

        // Phase 3: Answer generation
        let prompt = build_prompt(&plan.question, &sources);
        tracing::debug!(chunks = sources.len(), "generating answer");
        let answer = self.generator.generate(&prompt).await?;

        Ok(QueryResult {
            question: plan.question.clone(),
            answer,
            chunks_used: sources.len(),
            sources,
            explanation,
        })
    }

    /// Retrieve the chunks most similar to the question, without
    /// generating an answer. Used for `query` (retrieval only).
    pub async fn retrieve(
        &self,
        plan: &QueryPlan,
    ) -> Result<(Vec<SourceReference>, Option<QueryExplanation>)> {
        // Phase 1: Semantic retrieval
        let (ranked, query_norm) = self.retrieve_phase(plan).await?;

        // Phase 2: Result grounding with source references
        let sources = self.ground_results(&ranked).await?;

        let explanation = if plan.explain {
            Some(QueryExplanation {
                embedder_model: self.embedder.model_name().to_string(),
                embedding_dim: self.embedder.dimensions(),
                vectors_searched: self.vector_store.len().await?,
                query_norm,
                ranking_details: build_ranking_details(&sources),
            })
        } else {
            None
        };

        Ok((sources, explanation))
    }

    /// Phase 1: Semantic retrieval over the vector store
    async fn retrieve_phase(&self, plan: &QueryPlan) -> Result<(Vec<ScoredResult>, f32)> {
        let query_embeddings = self.embedder.embed(&[&plan.question]).await?;
        let query_embedding = query_embeddings.into_iter().next().ok_or_else(|| {
            KbragError::EmbedderUnavailable {
                reason: "embedder returned no vector for the question".to_string(),
                remediation: "check the embedder configuration".to_string(),
            }
        })?;

        let query_norm = query_embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

        let results = self
            .vector_store
            .similarity_search(&query_embedding, plan.top_k, plan.threshold)
            .await?;

        Ok((results, query_norm))
    }

    /// Phase 2: Ground results with source references
    async fn ground_results(&self, results: &[ScoredResult]) -> Result<Vec<SourceReference>> {
        let chunk_ids: Vec<ChunkId> = results.iter().map(|r| r.chunk_id).collect();
        let chunks = self.chunk_store.get_chunks(&chunk_ids).await?;

        let chunk_map: HashMap<ChunkId, Chunk> = chunks.into_iter().map(|c| (c.id, c)).collect();

        let mut sources = Vec::new();
        for result in results {
            if let Some(chunk) = chunk_map.get(&result.chunk_id) {
                sources.push(SourceReference {
                    chunk_id: chunk.id,
                    document: chunk.source.document.clone(),
                    author: chunk.metadata.author.clone(),
                    topic: chunk.metadata.topic.clone(),
                    excerpt: chunk.content.clone(),
                    score: result.score,
                });
            }
        }

        Ok(sources)
    }

}

/// Ranking details come from the grounded sources so scores always pair
/// with the document they were computed for, even when a chunk is
/// missing from the chunk store and its result was dropped.
fn build_ranking_details(sources: &[SourceReference]) -> Vec<RankingDetail> {
    sources
        .iter()
        .map(|source| RankingDetail {
            chunk_id: source.chunk_id,
            score: source.score,
            document: source.document.clone(),
        })
        .collect()
}

/// Assemble the generation prompt from the question and its sources
fn build_prompt(question: &str, sources: &[SourceReference]) -> String {
    let context_parts: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!(
                "[Source {}: {} by {}]\n{}",
                i + 1,
                source.document,
                source.author.as_deref().unwrap_or("Unknown"),
                source.excerpt
            )
        })
        .collect();

    format!(
        "Based on the following context from a knowledge base, please answer the question.\n\
         Only use information from the context provided. If the context doesn't contain enough information\n\
         to fully answer the question, say so clearly.\n\
         \n\
         Context:\n\
         {}\n\
         \n\
         Question: {}\n\
         \n\
         Answer: Provide a clear, comprehensive answer based on the context above. Include specific details\n\
         and cite which sources you're drawing from when relevant.",
        context_parts.join("\n\n"),
        question
    )
}
