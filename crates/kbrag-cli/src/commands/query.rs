use crate::cli::QueryArgs;
use crate::config_loader::load_config;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{ExplanationOutput, QueryOutput, QueryResultItem};
use crate::storage::Storage;
use anyhow::Result;
use kbrag_llm::{OllamaEmbedder, OllamaGenerator};
use kbrag_retrieval::models::QueryPlan;
use kbrag_retrieval::pipeline::RetrievalPipeline;
use tabled::Tabled;

#[derive(Tabled)]
struct QueryRow {
    #[tabled(rename = "Document")]
    document: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Excerpt")]
    excerpt: String,
}

pub async fn execute(args: QueryArgs, output: &OutputWriter, explain: bool) -> Result<()> {
    let config = load_config()?;
    let index_dir = &config.index_dir.value;

    if !kbrag_store::index_exists(index_dir) {
        return Err(errors::index_not_built(index_dir).into());
    }

    // Hydrate in-memory stores from the saved index
    let storage = Storage::load(index_dir).await?;

    // The embedder must match the one the index was built with
    let embedder = OllamaEmbedder::new(
        &config.ollama_url.value,
        &storage.state.embedder,
        storage.state.embedding_dim,
    );

    // Retrieval only, the generator is never invoked
    let generator = OllamaGenerator::new(&config.ollama_url.value, "unused");
    let pipeline = RetrievalPipeline::new(storage.vector, storage.chunks, embedder, generator);

    let mut plan = QueryPlan::new(&args.query)
        .with_top_k(args.top_k.unwrap_or(config.top_k.value))
        .with_explain(explain);
    if let Some(threshold) = args.threshold {
        plan = plan.with_threshold(threshold);
    }

    let (sources, explanation) = pipeline.retrieve(&plan).await.map_err(|e| {
        if e.to_string().contains("Embedder unavailable") {
            anyhow::Error::from(errors::ollama_unavailable(
                &storage.state.embedder,
                &e.to_string(),
            ))
        } else {
            anyhow::Error::from(e)
        }
    })?;

    if output.is_json() {
        let results: Vec<QueryResultItem> = sources
            .iter()
            .map(|s| QueryResultItem {
                document: s.document.clone(),
                author: s.author.clone(),
                topic: s.topic.clone(),
                score: s.score,
                content: s.excerpt.clone(),
            })
            .collect();

        output.result(QueryOutput {
            query: args.query.clone(),
            results,
            explanation: explanation.as_ref().map(|e| ExplanationOutput {
                embedder_model: e.embedder_model.clone(),
                embedding_dim: e.embedding_dim,
                vectors_searched: e.vectors_searched,
                query_norm: e.query_norm,
            }),
        })?;
        return Ok(());
    }

    if sources.is_empty() {
        output.warning("No matching chunks found");
        return Ok(());
    }

    output.section("Results");
    let rows: Vec<QueryRow> = sources
        .iter()
        .map(|s| QueryRow {
            document: s.document.clone(),
            author: s.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            score: format!("{:.3}", s.score),
            excerpt: truncate(&s.excerpt, 60),
        })
        .collect();
    output.table(rows);

    if args.show_context {
        output.section("Chunk Content");
        for (i, source) in sources.iter().enumerate() {
            output.info(format!("\n{}. {} (score: {:.3})", i + 1, source.document, source.score));
            output.info(&source.excerpt);
        }
    }

    if let Some(explanation) = explanation {
        output.section("Explanation");
        output.kv("Embedder", &explanation.embedder_model);
        output.kv("Embedding Dimension", explanation.embedding_dim);
        output.kv("Vectors Searched", explanation.vectors_searched);
        output.kv("Query Norm", format!("{:.3}", explanation.query_norm));
    }

    Ok(())
}

/// Truncate a string on a char boundary, appending an ellipsis
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
