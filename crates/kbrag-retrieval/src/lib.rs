//! kbrag-retrieval - Indexing and question answering pipelines
//!
//! This crate implements the retrieval use cases: embedding chunks into an
//! index, and answering questions grounded on the retrieved chunks.

pub mod embedding;
pub mod index;
pub mod models;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use embedding::EmbeddingPipeline;
pub use index::{IndexBuildResult, IndexBuilder, IndexPhase, IndexProgress};
pub use models::{
    QueryExplanation, QueryPlan, QueryResult, RankingDetail, SourceReference,
};
pub use pipeline::RetrievalPipeline;
