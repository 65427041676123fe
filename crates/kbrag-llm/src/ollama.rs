use crate::ports::{Embedder, Generator};
use async_trait::async_trait;
use kbrag_core::error::{KbragError, Result};
use serde::{Deserialize, Serialize};

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    /// Embedding dimensions (model-specific)
    dimensions: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimensions,
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>, dimensions: usize) -> Self {
        Self::new("http://localhost:11434", model, dimensions)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let request = OllamaEmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| KbragError::EmbedderUnavailable {
                reason: format!("Failed to connect to Ollama: {}", e),
                remediation: format!(
                    "Ensure Ollama is running at {} and the model '{}' is available. \
                     Run 'ollama pull {}' to download the model.",
                    self.base_url, self.model, self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KbragError::EmbedderUnavailable {
                reason: format!("Ollama API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that the model '{}' is available. Run 'ollama list' to see installed models.",
                    self.model
                ),
            });
        }

        let embed_response: OllamaEmbedResponse =
            response.json().await.map_err(|e| KbragError::EmbedderUnavailable {
                reason: format!("Failed to parse Ollama response: {}", e),
                remediation: "Check Ollama API compatibility".to_string(),
            })?;

        Ok(embed_response.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Ollama generator implementation
pub struct OllamaGenerator {
    /// Base URL for Ollama API
    base_url: String,

    /// Model name to use for generation
    model: String,

    /// Sampling temperature
    temperature: f32,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            temperature: 0.7,
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>) -> Self {
        Self::new("http://localhost:11434", model)
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaGenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Generating answer");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| KbragError::GeneratorUnavailable {
                reason: format!("Failed to connect to Ollama: {}", e),
                remediation: format!(
                    "Ensure Ollama is running at {} and the model '{}' is available. \
                     Run 'ollama pull {}' to download the model.",
                    self.base_url, self.model, self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KbragError::GeneratorUnavailable {
                reason: format!("Ollama API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that the model '{}' is available. Run 'ollama list' to see installed models.",
                    self.model
                ),
            });
        }

        let generate_response: OllamaGenerateResponse =
            response.json().await.map_err(|e| KbragError::GeneratorUnavailable {
                reason: format!("Failed to parse Ollama response: {}", e),
                remediation: "Check Ollama API compatibility".to_string(),
            })?;

        Ok(generate_response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest {
    model: String,
    prompt: String,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Request body for Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaGenerateOptions,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}
