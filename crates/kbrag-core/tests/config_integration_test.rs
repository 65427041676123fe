//! Integration tests for layered configuration loading
//!
//! Environment-variable tests run serially because they mutate process
//! state shared between test threads.

use kbrag_core::config::{ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_kbrag_env() {
    for key in [
        "KBRAG_DOCS_DIR",
        "KBRAG_INDEX_DIR",
        "KBRAG_CHUNK_SIZE",
        "KBRAG_CHUNK_OVERLAP",
        "KBRAG_TOP_K",
        "KBRAG_EMBEDDER",
        "KBRAG_GENERATOR",
        "KBRAG_OLLAMA_URL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_kbrag_env();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "chunk_size = 800\ntop_k = 5").unwrap();

    env::set_var("KBRAG_CHUNK_SIZE", "1000");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.chunk_size.value, 1000);
    assert_eq!(config.chunk_size.source, ConfigSource::Environment);
    // File value untouched by env
    assert_eq!(config.top_k.value, 5);
    assert_eq!(config.top_k.source, ConfigSource::File);

    clear_kbrag_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_ignored() {
    clear_kbrag_env();

    env::set_var("KBRAG_TOP_K", "not-a-number");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.top_k.value, 3);
    assert_eq!(config.top_k.source, ConfigSource::Default);

    clear_kbrag_env();
}

#[test]
#[serial]
fn test_env_string_values() {
    clear_kbrag_env();

    env::set_var("KBRAG_EMBEDDER", "ollama:mxbai-embed-large");
    env::set_var("KBRAG_OLLAMA_URL", "http://gpu-box:11434");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.embedder.value, "ollama:mxbai-embed-large");
    assert_eq!(config.ollama_url.value, "http://gpu-box:11434");
    assert_eq!(config.embedder.source, ConfigSource::Environment);

    clear_kbrag_env();
}
