use crate::cli::BuildArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::BuildOutput;
use crate::progress::BuildProgress;
use crate::storage::Storage;
use anyhow::Result;
use kbrag_core::config::CliConfigOverrides;
use kbrag_core::models::DocumentStats;
use kbrag_core::processing::{ChunkSplitter, DocumentLoader};
use kbrag_llm::embedder_from_spec;
use kbrag_retrieval::{IndexBuilder, IndexPhase};
use std::path::Path;

pub async fn execute(args: BuildArgs, output: &OutputWriter) -> Result<()> {
    // Load layered configuration with CLI overrides
    let overrides = CliConfigOverrides {
        docs_dir: args.docs_dir.clone(),
        chunk_size: args.chunk_size,
        chunk_overlap: args.chunk_overlap,
        embedder: args.embedder.clone(),
        ..Default::default()
    };
    let config = load_config_with_overrides(overrides)?;

    let docs_dir = &config.docs_dir.value;
    let index_dir = &config.index_dir.value;

    if !Path::new(docs_dir).is_dir() {
        return Err(errors::docs_dir_not_found(docs_dir).into());
    }

    // Refuse to clobber an existing index unless forced
    if kbrag_store::index_exists(index_dir) && !args.force {
        output.info("Index already exists. Use --force to rebuild.");
        return Ok(());
    }

    let progress = BuildProgress::new();

    // Load documents
    let documents = DocumentLoader::new(docs_dir.as_str()).load()?;
    if documents.is_empty() {
        return Err(errors::no_documents(docs_dir).into());
    }
    let stats = DocumentStats::compute(&documents);
    progress.finish_load(stats.total_documents, stats.total_words);

    // Split into chunks
    let splitter = ChunkSplitter::new(config.chunk_size.value, config.chunk_overlap.value)?;
    let chunks = splitter.split_documents(&documents);
    progress.finish_chunk(chunks.len());

    // Create embedder from config
    let embedder = embedder_from_spec(&config.embedder.value, &config.ollama_url.value)?;

    // Build the index into fresh in-memory stores
    let (vector_store, chunk_store) = Storage::empty();
    let builder = IndexBuilder::new(vector_store, chunk_store, embedder).with_batch_size(32);

    progress.start_embeddings(chunks.len() as u64);
    let result = builder
        .build_with_progress(&chunks, |p| {
            if p.phase == IndexPhase::GeneratingEmbeddings {
                progress.update_embeddings(p.current as u64);
            }
        })
        .await
        .map_err(|e| {
            if e.to_string().contains("Embedder unavailable") {
                let model = config
                    .embedder
                    .value
                    .split_once(':')
                    .map(|(_, m)| m)
                    .unwrap_or(&config.embedder.value);
                anyhow::Error::from(errors::ollama_unavailable(model, &e.to_string()))
            } else {
                anyhow::anyhow!("Failed to build index: {}", e)
            }
        })?;
    progress.finish_embeddings(result.embeddings.len());

    // Persist the index
    let state = builder.create_index_state(&result);
    kbrag_store::save_index(index_dir, &chunks, &result.embeddings, &state)?;
    progress.finish_finalize(&result.index_hash);

    if output.is_json() {
        output.result(BuildOutput {
            index_hash: result.index_hash,
            document_count: stats.total_documents,
            chunk_count: result.chunk_count,
            embedding_dim: result.embedding_dim,
            embedder: config.embedder.value.clone(),
            total_words: stats.total_words,
        })?;
    } else {
        output.success("Index built successfully");
        output.section("Index Information");
        output.kv("Hash", &result.index_hash);
        output.kv("Documents", stats.total_documents);
        output.kv("Chunks", result.chunk_count);
        output.kv("Embedding Dimension", result.embedding_dim);
        output.kv("Embedder", &config.embedder.value);
        output.kv("Authors", stats.authors.join(", "));
        output.kv("Saved To", index_dir);
    }

    Ok(())
}
