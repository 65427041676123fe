//! kbrag-llm - Embedding and generation ports
//!
//! This crate defines the ports for embedding and text generation,
//! along with Ollama adapter implementations.

pub mod ollama;
pub mod ports;

pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use ports::{Embedder, Generator};

use kbrag_core::error::{KbragError, Result};

/// Embedding dimensions for known Ollama models. Unknown models fall
/// back to 768, which matches most nomic-style embedders.
fn embedding_dimensions(model: &str) -> usize {
    match model {
        "nomic-embed-text" => 768,
        "mxbai-embed-large" => 1024,
        "all-minilm" => 384,
        "snowflake-arctic-embed" => 1024,
        _ => 768,
    }
}

/// Create an embedder from a spec string like `"ollama:nomic-embed-text"`
pub fn embedder_from_spec(spec: &str, base_url: &str) -> Result<OllamaEmbedder> {
    match spec.split_once(':') {
        Some(("ollama", model)) if !model.is_empty() => {
            Ok(OllamaEmbedder::new(base_url, model, embedding_dimensions(model)))
        }
        _ => Err(KbragError::ConfigInvalid {
            key: "embedder".to_string(),
            reason: format!("Invalid embedder spec '{}'. Use ollama:<model-name>", spec),
        }),
    }
}

/// Create a generator from a spec string like `"ollama:llama3"`
pub fn generator_from_spec(spec: &str, base_url: &str) -> Result<OllamaGenerator> {
    match spec.split_once(':') {
        Some(("ollama", model)) if !model.is_empty() => {
            Ok(OllamaGenerator::new(base_url, model))
        }
        _ => Err(KbragError::ConfigInvalid {
            key: "generator".to_string(),
            reason: format!("Invalid generator spec '{}'. Use ollama:<model-name>", spec),
        }),
    }
}
