use crate::cli::AskArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors;
use crate::interactive;
use crate::output::OutputWriter;
use crate::output_types::{AskOutput, ExplanationOutput, SourceItem};
use crate::progress::create_spinner;
use crate::storage::Storage;
use anyhow::Result;
use kbrag_core::config::CliConfigOverrides;
use kbrag_llm::{generator_from_spec, OllamaEmbedder, OllamaGenerator};
use kbrag_retrieval::models::{QueryPlan, QueryResult};
use kbrag_retrieval::pipeline::RetrievalPipeline;

pub async fn execute(args: AskArgs, output: &OutputWriter, explain: bool) -> Result<()> {
    let overrides = CliConfigOverrides {
        top_k: args.top_k,
        generator: args.generator.clone(),
        ..Default::default()
    };
    let config = load_config_with_overrides(overrides)?;
    let index_dir = &config.index_dir.value;

    if !kbrag_store::index_exists(index_dir) {
        return Err(errors::index_not_built(index_dir).into());
    }

    let storage = Storage::load(index_dir).await?;

    // The embedder must match the one the index was built with
    let embedder = OllamaEmbedder::new(
        &config.ollama_url.value,
        &storage.state.embedder,
        storage.state.embedding_dim,
    );
    let generator = generator_from_spec(&config.generator.value, &config.ollama_url.value)?;
    let generator_model = config.generator.value.clone();

    let pipeline = RetrievalPipeline::new(storage.vector, storage.chunks, embedder, generator);

    match args.question {
        Some(question) => {
            let result = ask_one(
                &pipeline,
                &question,
                config.top_k.value,
                explain,
                &storage.state.embedder,
                &generator_model,
            )
            .await?;
            display_result(&result, output, args.show_context)?;
            Ok(())
        }
        None => {
            interactive::run(
                &pipeline,
                config.top_k.value,
                output,
                &storage.state.embedder,
                &generator_model,
            )
            .await
        }
    }
}

pub async fn ask_one(
    pipeline: &RetrievalPipeline<OllamaEmbedder, OllamaGenerator>,
    question: &str,
    top_k: usize,
    explain: bool,
    embedder_model: &str,
    generator_model: &str,
) -> Result<QueryResult> {
    let plan = QueryPlan::new(question).with_top_k(top_k).with_explain(explain);

    let spinner = create_spinner("Searching the knowledge base...");
    let result = pipeline.execute(&plan).await;
    spinner.finish_and_clear();

    result.map_err(|e| {
        let message = e.to_string();
        if message.contains("Embedder unavailable") {
            anyhow::Error::from(errors::ollama_unavailable(embedder_model, &message))
        } else if message.contains("Generator unavailable") {
            anyhow::Error::from(errors::ollama_unavailable(generator_model, &message))
        } else {
            anyhow::Error::from(e)
        }
    })
}

pub fn display_result(
    result: &QueryResult,
    output: &OutputWriter,
    show_context: bool,
) -> Result<()> {
    if output.is_json() {
        let sources: Vec<SourceItem> = result
            .cited_documents()
            .iter()
            .map(|s| SourceItem {
                file: s.document.clone(),
                author: s.author.clone().unwrap_or_else(|| "Unknown".to_string()),
                topic: s.topic.clone().unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect();

        output.result(AskOutput {
            question: result.question.clone(),
            answer: result.answer.clone(),
            sources,
            chunks_used: result.chunks_used,
            explanation: result.explanation.as_ref().map(|e| ExplanationOutput {
                embedder_model: e.embedder_model.clone(),
                embedding_dim: e.embedding_dim,
                vectors_searched: e.vectors_searched,
                query_norm: e.query_norm,
            }),
        })?;
        return Ok(());
    }

    if show_context && !result.sources.is_empty() {
        output.section("Retrieved Context");
        for (i, source) in result.sources.iter().enumerate() {
            output.info(format!(
                "\n[Source {}: {} by {}] (score: {:.3})",
                i + 1,
                source.document,
                source.author.as_deref().unwrap_or("Unknown"),
                source.score
            ));
            output.info(&source.excerpt);
        }
    }

    output.section("Answer");
    println!("{}", result.answer);

    let cited = result.cited_documents();
    if !cited.is_empty() {
        output.section(format!("Based on {} source(s)", cited.len()));
        for source in cited {
            output.info(format!(
                "• {} - {} (by {})",
                source.document,
                source.topic.as_deref().unwrap_or("Unknown"),
                source.author.as_deref().unwrap_or("Unknown")
            ));
        }
    }

    if let Some(ref explanation) = result.explanation {
        output.section("Explanation");
        output.kv("Embedder", &explanation.embedder_model);
        output.kv("Embedding Dimension", explanation.embedding_dim);
        output.kv("Vectors Searched", explanation.vectors_searched);
        output.kv("Query Norm", format!("{:.3}", explanation.query_norm));

        if !explanation.ranking_details.is_empty() {
            output.section("Ranking Details");
            for (i, detail) in explanation.ranking_details.iter().enumerate() {
                output.info(format!(
                    "{}. {} (chunk {}): {:.3}",
                    i + 1,
                    detail.document,
                    detail.chunk_id.0,
                    detail.score
                ));
            }
        }
    }

    Ok(())
}
