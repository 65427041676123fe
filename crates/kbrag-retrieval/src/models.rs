use kbrag_core::models::ChunkId;
use serde::{Deserialize, Serialize};

/// Plan for answering a single question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPlan {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve
    pub top_k: usize,

    /// Optional minimum similarity for retrieved chunks
    pub threshold: Option<f32>,

    /// Whether to include detailed explanation
    pub explain: bool,
}

impl QueryPlan {
    /// Create a new query plan
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: 3,
            threshold: None,
            explain: false,
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the minimum similarity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Enable detailed explanation
    pub fn with_explain(mut self, enabled: bool) -> Self {
        self.explain = enabled;
        self
    }
}

/// Answer to a question, with the sources it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The original question
    pub question: String,

    /// The generated answer
    pub answer: String,

    /// Source references used to ground the answer, one per retrieved chunk
    pub sources: Vec<SourceReference>,

    /// Number of chunks fed to the generator
    pub chunks_used: usize,

    /// Optional detailed explanation
    pub explanation: Option<QueryExplanation>,
}

impl QueryResult {
    /// Sources deduplicated by document/author/topic, preserving rank order
    pub fn cited_documents(&self) -> Vec<&SourceReference> {
        let mut seen = Vec::new();
        let mut cited = Vec::new();
        for source in &self.sources {
            let key = (&source.document, &source.author, &source.topic);
            if !seen.contains(&key) {
                seen.push(key);
                cited.push(source);
            }
        }
        cited
    }
}

/// Reference to a source chunk backing an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReference {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Source document file name
    pub document: String,

    /// Document author, if known
    pub author: Option<String>,

    /// Document topic, if known
    pub topic: Option<String>,

    /// Text excerpt (the chunk content)
    pub excerpt: String,

    /// Similarity score
    pub score: f32,
}

/// Detailed explanation of how an answer was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryExplanation {
    /// Embedder model used
    pub embedder_model: String,

    /// Embedding dimension
    pub embedding_dim: usize,

    /// Number of vectors searched
    pub vectors_searched: usize,

    /// Query embedding norm
    pub query_norm: f32,

    /// Per-result ranking details
    pub ranking_details: Vec<RankingDetail>,
}

/// Ranking detail for a single retrieved chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingDetail {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Cosine similarity against the question
    pub score: f32,

    /// Source document file name
    pub document: String,
}
