//! Error types for the knowledge base

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KbragError {
    // Document errors
    #[error("Document directory not found at {path}")]
    DocumentDirNotFound { path: PathBuf },

    #[error("Failed to read document {path}: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },

    // Index errors
    #[error("Index not built. Run 'kbrag build' first")]
    IndexNotBuilt,

    #[error("Index not found at {path}")]
    IndexNotFound { path: PathBuf },

    // Model backend errors
    #[error("Embedder unavailable: {reason}. Try: {remediation}")]
    EmbedderUnavailable {
        reason: String,
        remediation: String,
    },

    #[error("Generator unavailable: {reason}. Try: {remediation}")]
    GeneratorUnavailable {
        reason: String,
        remediation: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, KbragError>;
