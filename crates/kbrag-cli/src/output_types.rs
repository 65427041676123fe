use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output for build command
#[derive(Debug, Serialize)]
pub struct BuildOutput {
    pub index_hash: String,
    pub document_count: usize,
    pub chunk_count: usize,
    pub embedding_dim: usize,
    pub embedder: String,
    pub total_words: usize,
}

/// Output for query command
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub query: String,
    pub results: Vec<QueryResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationOutput>,
}

#[derive(Debug, Serialize)]
pub struct QueryResultItem {
    pub document: String,
    pub author: Option<String>,
    pub topic: Option<String>,
    pub score: f32,
    pub content: String,
}

/// Output for ask command
#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceItem>,
    pub chunks_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationOutput>,
}

#[derive(Debug, Serialize)]
pub struct SourceItem {
    pub file: String,
    pub author: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ExplanationOutput {
    pub embedder_model: String,
    pub embedding_dim: usize,
    pub vectors_searched: usize,
    pub query_norm: f32,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub docs_dir: String,
    pub docs_dir_exists: bool,
    pub document_count: Option<usize>,
    pub index: IndexStatus,
    pub config: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct IndexStatus {
    pub built: bool,
    pub hash: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
    pub embedder: Option<String>,
    pub chunk_count: Option<usize>,
    pub embedding_dim: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}
