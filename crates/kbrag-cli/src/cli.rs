use clap::{Parser, Subcommand};

/// kbrag - Personal knowledge base with retrieval-augmented Q&A
#[derive(Parser, Debug)]
#[command(name = "kbrag")]
#[command(about = "Personal knowledge base with retrieval-augmented Q&A", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show detailed explanation of operations
    #[arg(long, global = true)]
    pub explain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the vector index from the document collection
    Build(BuildArgs),

    /// Search the index and show the closest chunks
    Query(QueryArgs),

    /// Ask a question and get an answer with source citations
    Ask(AskArgs),

    /// Show knowledge base status and configuration
    Status(StatusArgs),
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory containing the document collection
    #[arg(long)]
    pub docs_dir: Option<String>,

    /// Maximum characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlapping characters between chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Embedder to use (e.g., "ollama:nomic-embed-text")
    #[arg(long)]
    pub embedder: Option<String>,

    /// Force rebuild even if an index already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// The search text
    pub query: String,

    /// Number of chunks to return
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Minimum similarity score (0.0 to 1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Show the full chunk content instead of a short excerpt
    #[arg(long)]
    pub show_context: bool,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to answer (omit for an interactive session)
    pub question: Option<String>,

    /// Number of chunks to retrieve
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Generator to use (e.g., "ollama:llama3")
    #[arg(long)]
    pub generator: Option<String>,

    /// Print the retrieved context sent to the generator
    #[arg(long)]
    pub show_context: bool,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show the full configuration with value sources
    #[arg(long)]
    pub verbose: bool,
}
