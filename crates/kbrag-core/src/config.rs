use crate::error::{KbragError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the knowledge base
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Directory containing the document collection
    pub docs_dir: ConfigValue<String>,
    /// Directory the vector index is saved to
    pub index_dir: ConfigValue<String>,
    /// Maximum characters per chunk
    pub chunk_size: ConfigValue<usize>,
    /// Overlapping characters between chunks
    pub chunk_overlap: ConfigValue<usize>,
    /// Number of chunks retrieved per question
    pub top_k: ConfigValue<usize>,
    /// Embedder spec, e.g. "ollama:nomic-embed-text"
    pub embedder: ConfigValue<String>,
    /// Generator spec, e.g. "ollama:llama3"
    pub generator: ConfigValue<String>,
    /// Base URL of the Ollama server
    pub ollama_url: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            docs_dir: ConfigValue::new("knowledge_base".to_string(), ConfigSource::Default),
            index_dir: ConfigValue::new("vector_index".to_string(), ConfigSource::Default),
            chunk_size: ConfigValue::new(500, ConfigSource::Default),
            chunk_overlap: ConfigValue::new(50, ConfigSource::Default),
            top_k: ConfigValue::new(3, ConfigSource::Default),
            embedder: ConfigValue::new(
                "ollama:nomic-embed-text".to_string(),
                ConfigSource::Default,
            ),
            generator: ConfigValue::new("ollama:llama3".to_string(), ConfigSource::Default),
            ollama_url: ConfigValue::new(
                "http://localhost:11434".to_string(),
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| KbragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| KbragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(docs_dir) = file_config.docs_dir {
            self.docs_dir.update(docs_dir, ConfigSource::File);
        }

        if let Some(index_dir) = file_config.index_dir {
            self.index_dir.update(index_dir, ConfigSource::File);
        }

        if let Some(chunk_size) = file_config.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::File);
        }

        if let Some(chunk_overlap) = file_config.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::File);
        }

        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, ConfigSource::File);
        }

        if let Some(embedder) = file_config.embedder {
            self.embedder.update(embedder, ConfigSource::File);
        }

        if let Some(generator) = file_config.generator {
            self.generator.update(generator, ConfigSource::File);
        }

        if let Some(ollama_url) = file_config.ollama_url {
            self.ollama_url.update(ollama_url, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(docs_dir) = env::var("KBRAG_DOCS_DIR") {
            self.docs_dir.update(docs_dir, ConfigSource::Environment);
        }

        if let Ok(index_dir) = env::var("KBRAG_INDEX_DIR") {
            self.index_dir.update(index_dir, ConfigSource::Environment);
        }

        if let Ok(size_str) = env::var("KBRAG_CHUNK_SIZE") {
            match size_str.parse::<usize>() {
                Ok(size) => self.chunk_size.update(size, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid KBRAG_CHUNK_SIZE value '{}': expected positive integer",
                    size_str
                ),
            }
        }

        if let Ok(overlap_str) = env::var("KBRAG_CHUNK_OVERLAP") {
            match overlap_str.parse::<usize>() {
                Ok(overlap) => self.chunk_overlap.update(overlap, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid KBRAG_CHUNK_OVERLAP value '{}': expected positive integer",
                    overlap_str
                ),
            }
        }

        if let Ok(k_str) = env::var("KBRAG_TOP_K") {
            match k_str.parse::<usize>() {
                Ok(k) => self.top_k.update(k, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid KBRAG_TOP_K value '{}': expected positive integer",
                    k_str
                ),
            }
        }

        if let Ok(embedder) = env::var("KBRAG_EMBEDDER") {
            self.embedder.update(embedder, ConfigSource::Environment);
        }

        if let Ok(generator) = env::var("KBRAG_GENERATOR") {
            self.generator.update(generator, ConfigSource::Environment);
        }

        if let Ok(url) = env::var("KBRAG_OLLAMA_URL") {
            self.ollama_url.update(url, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(docs_dir) = overrides.docs_dir {
            self.docs_dir.update(docs_dir, ConfigSource::Cli);
        }

        if let Some(index_dir) = overrides.index_dir {
            self.index_dir.update(index_dir, ConfigSource::Cli);
        }

        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::Cli);
        }

        if let Some(chunk_overlap) = overrides.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::Cli);
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, ConfigSource::Cli);
        }

        if let Some(embedder) = overrides.embedder {
            self.embedder.update(embedder, ConfigSource::Cli);
        }

        if let Some(generator) = overrides.generator {
            self.generator.update(generator, ConfigSource::Cli);
        }

        if let Some(ollama_url) = overrides.ollama_url {
            self.ollama_url.update(ollama_url, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "docs_dir".to_string(),
            (self.docs_dir.value.clone(), self.docs_dir.source),
        );
        map.insert(
            "index_dir".to_string(),
            (self.index_dir.value.clone(), self.index_dir.source),
        );
        map.insert(
            "chunk_size".to_string(),
            (self.chunk_size.value.to_string(), self.chunk_size.source),
        );
        map.insert(
            "chunk_overlap".to_string(),
            (self.chunk_overlap.value.to_string(), self.chunk_overlap.source),
        );
        map.insert("top_k".to_string(), (self.top_k.value.to_string(), self.top_k.source));
        map.insert(
            "embedder".to_string(),
            (self.embedder.value.clone(), self.embedder.source),
        );
        map.insert(
            "generator".to_string(),
            (self.generator.value.clone(), self.generator.source),
        );
        map.insert(
            "ollama_url".to_string(),
            (self.ollama_url.value.clone(), self.ollama_url.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    docs_dir: Option<String>,
    index_dir: Option<String>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    top_k: Option<usize>,
    embedder: Option<String>,
    generator: Option<String>,
    ollama_url: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub docs_dir: Option<String>,
    pub index_dir: Option<String>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub top_k: Option<usize>,
    pub embedder: Option<String>,
    pub generator: Option<String>,
    pub ollama_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.docs_dir.value, "knowledge_base");
        assert_eq!(config.docs_dir.source, ConfigSource::Default);
        assert_eq!(config.chunk_size.value, 500);
        assert_eq!(config.chunk_overlap.value, 50);
        assert_eq!(config.top_k.value, 3);
        assert_eq!(config.embedder.value, "ollama:nomic-embed-text");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
docs_dir = "my_notes"
chunk_size = 800
top_k = 5
embedder = "ollama:custom-model"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.docs_dir.value, "my_notes");
        assert_eq!(config.docs_dir.source, ConfigSource::File);
        assert_eq!(config.chunk_size.value, 800);
        assert_eq!(config.top_k.value, 5);
        assert_eq!(config.embedder.value, "ollama:custom-model");
        // Untouched values stay at defaults
        assert_eq!(config.chunk_overlap.value, 50);
        assert_eq!(config.chunk_overlap.source, ConfigSource::Default);
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/kbrag.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            docs_dir: Some("cli_docs".to_string()),
            top_k: Some(7),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.docs_dir.value, "cli_docs");
        assert_eq!(config.docs_dir.source, ConfigSource::Cli);
        assert_eq!(config.top_k.value, 7);
        assert_eq!(config.top_k.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.embedder.source, ConfigSource::Default);
        assert_eq!(config.generator.source, ConfigSource::Default);
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("docs_dir"));
        assert!(map.contains_key("chunk_size"));
        assert!(map.contains_key("embedder"));
        assert!(map.contains_key("ollama_url"));

        let (docs_value, docs_source) = &map["docs_dir"];
        assert_eq!(docs_value, "knowledge_base");
        assert_eq!(*docs_source, ConfigSource::Default);
    }
}
