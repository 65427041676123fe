//! kbrag-core - Domain models, configuration, and document processing
//!
//! This crate contains the core domain logic for the knowledge base:
//! document loading, metadata parsing, and chunk splitting.

pub mod config;
pub mod error;
pub mod models;
pub mod processing;

pub use error::{KbragError, Result};
