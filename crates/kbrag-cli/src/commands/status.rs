use crate::cli::StatusArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, IndexStatus, StatusOutput};
use anyhow::Result;
use kbrag_core::config::ConfigSource;
use kbrag_core::models::DocumentStats;
use kbrag_core::processing::DocumentLoader;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub async fn execute(args: StatusArgs, output: &OutputWriter) -> Result<()> {
    let config = load_config()?;
    let docs_dir = &config.docs_dir.value;
    let index_dir = &config.index_dir.value;

    let docs_dir_exists = Path::new(docs_dir).is_dir();
    let doc_stats = if docs_dir_exists {
        DocumentLoader::new(docs_dir.as_str())
            .load()
            .map(|docs| DocumentStats::compute(&docs))
            .ok()
    } else {
        None
    };
    let document_count = doc_stats.as_ref().map(|s| s.total_documents);

    let index = if kbrag_store::index_exists(index_dir) {
        match kbrag_store::load_state(index_dir) {
            Ok(state) => IndexStatus {
                built: true,
                hash: Some(state.hash),
                built_at: Some(state.built_at),
                embedder: Some(state.embedder),
                chunk_count: Some(state.chunk_count),
                embedding_dim: Some(state.embedding_dim),
            },
            Err(e) => {
                output.warning(format!("Index state unreadable: {}", e));
                IndexStatus {
                    built: false,
                    hash: None,
                    built_at: None,
                    embedder: None,
                    chunk_count: None,
                    embedding_dim: None,
                }
            }
        }
    } else {
        IndexStatus {
            built: false,
            hash: None,
            built_at: None,
            embedder: None,
            chunk_count: None,
            embedding_dim: None,
        }
    };

    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry {
            key,
            value,
            source: source_label(source).to_string(),
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(StatusOutput {
            docs_dir: docs_dir.clone(),
            docs_dir_exists,
            document_count,
            index,
            config: entries,
        })?;
        return Ok(());
    }

    output.section("Documents");
    output.kv("Directory", docs_dir);
    match doc_stats {
        Some(ref stats) => {
            output.kv("Documents", stats.total_documents);
            output.kv("Total Words", stats.total_words);
            output.kv("Authors", stats.authors.join(", "));
            output.kv("Topics", stats.topics.len());
        }
        None => output.warning(format!("Document directory not found: {}", docs_dir)),
    }

    output.section("Index");
    if index.built {
        output.kv("Built", "yes");
        output.kv("Hash", index.hash.as_deref().unwrap_or("-"));
        if let Some(built_at) = index.built_at {
            output.kv("Built At", built_at.to_rfc3339());
        }
        output.kv("Embedder", index.embedder.as_deref().unwrap_or("-"));
        output.kv("Chunks", index.chunk_count.unwrap_or(0));
        output.kv("Embedding Dimension", index.embedding_dim.unwrap_or(0));
    } else {
        output.kv("Built", "no");
        output.info("Run 'kbrag build' to build the index");
    }

    if args.verbose {
        output.section("Configuration");
        let rows: Vec<ConfigRow> = entries
            .into_iter()
            .map(|e| ConfigRow {
                key: e.key,
                value: e.value,
                source: e.source,
            })
            .collect();
        output.table(rows);
    }

    Ok(())
}

fn source_label(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "environment",
        ConfigSource::Cli => "cli",
    }
}
