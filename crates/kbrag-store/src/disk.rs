//! On-disk index persistence.
//!
//! A saved index is a directory with three JSON files: `chunks.json`,
//! `embeddings.json`, and `state.json`. Saving an index avoids
//! re-embedding the document collection on every run.

use kbrag_core::error::{KbragError, Result};
use kbrag_core::models::{Chunk, Embedding, IndexState};
use std::fs;
use std::path::Path;

const CHUNKS_FILE: &str = "chunks.json";
const EMBEDDINGS_FILE: &str = "embeddings.json";
const STATE_FILE: &str = "state.json";

/// A fully loaded index snapshot
#[derive(Debug)]
pub struct IndexSnapshot {
    pub chunks: Vec<Chunk>,
    pub embeddings: Vec<Embedding>,
    pub state: IndexState,
}

/// Check whether a saved index exists at the given directory
pub fn index_exists(dir: impl AsRef<Path>) -> bool {
    dir.as_ref().join(STATE_FILE).exists()
}

/// Save an index to disk, creating the directory if needed
pub fn save_index(
    dir: impl AsRef<Path>,
    chunks: &[Chunk],
    embeddings: &[Embedding],
    state: &IndexState,
) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_json(&dir.join(CHUNKS_FILE), chunks)?;
    write_json(&dir.join(EMBEDDINGS_FILE), embeddings)?;
    write_json(&dir.join(STATE_FILE), state)?;

    tracing::info!(
        path = %dir.display(),
        chunks = chunks.len(),
        vectors = embeddings.len(),
        "Saved index"
    );

    Ok(())
}

/// Load a saved index from disk
pub fn load_index(dir: impl AsRef<Path>) -> Result<IndexSnapshot> {
    let dir = dir.as_ref();

    if !index_exists(dir) {
        return Err(KbragError::IndexNotFound {
            path: dir.to_path_buf(),
        });
    }

    let chunks: Vec<Chunk> = read_json(&dir.join(CHUNKS_FILE))?;
    let embeddings: Vec<Embedding> = read_json(&dir.join(EMBEDDINGS_FILE))?;
    let state: IndexState = read_json(&dir.join(STATE_FILE))?;

    tracing::info!(
        path = %dir.display(),
        chunks = chunks.len(),
        vectors = embeddings.len(),
        "Loaded index"
    );

    Ok(IndexSnapshot {
        chunks,
        embeddings,
        state,
    })
}

/// Read just the index state, without loading chunks and vectors
pub fn load_state(dir: impl AsRef<Path>) -> Result<IndexState> {
    let dir = dir.as_ref();

    if !index_exists(dir) {
        return Err(KbragError::IndexNotFound {
            path: dir.to_path_buf(),
        });
    }

    read_json(&dir.join(STATE_FILE))
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| KbragError::Serialization(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| KbragError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kbrag_core::models::{ChunkId, ChunkSource, DocMetadata};
    use tempfile::TempDir;

    fn sample_index() -> (Vec<Chunk>, Vec<Embedding>, IndexState) {
        let chunks = vec![Chunk {
            id: ChunkId(42),
            content: "Persisted chunk content".to_string(),
            source: ChunkSource {
                document: "notes.txt".to_string(),
                seq: 0,
                offset: 0,
            },
            metadata: DocMetadata {
                author: Some("Author".to_string()),
                ..Default::default()
            },
        }];

        let embeddings = vec![Embedding {
            chunk_id: ChunkId(42),
            vector: vec![0.1, 0.2, 0.3],
        }];

        let state = IndexState {
            hash: "deadbeefdeadbeef".to_string(),
            built_at: Utc::now(),
            embedder: "nomic-embed-text".to_string(),
            chunk_count: 1,
            embedding_dim: 3,
        };

        (chunks, embeddings, state)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let (chunks, embeddings, state) = sample_index();

        save_index(dir.path(), &chunks, &embeddings, &state).unwrap();
        assert!(index_exists(dir.path()));

        let snapshot = load_index(dir.path()).unwrap();
        assert_eq!(snapshot.chunks.len(), 1);
        assert_eq!(snapshot.chunks[0].id, ChunkId(42));
        assert_eq!(snapshot.chunks[0].content, "Persisted chunk content");
        assert_eq!(snapshot.embeddings[0].vector, vec![0.1, 0.2, 0.3]);
        assert_eq!(snapshot.state.hash, state.hash);
        assert_eq!(snapshot.state.embedder, "nomic-embed-text");
    }

    #[test]
    fn test_load_missing_index_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_index(dir.path().join("nothing_here"));

        assert!(matches!(result, Err(KbragError::IndexNotFound { .. })));
    }

    #[test]
    fn test_load_state_only() {
        let dir = TempDir::new().unwrap();
        let (chunks, embeddings, state) = sample_index();
        save_index(dir.path(), &chunks, &embeddings, &state).unwrap();

        let loaded = load_state(dir.path()).unwrap();
        assert_eq!(loaded.chunk_count, 1);
        assert_eq!(loaded.embedding_dim, 3);
    }

    #[test]
    fn test_save_overwrites_previous_index() {
        let dir = TempDir::new().unwrap();
        let (chunks, embeddings, mut state) = sample_index();

        save_index(dir.path(), &chunks, &embeddings, &state).unwrap();

        state.hash = "0000000000000000".to_string();
        save_index(dir.path(), &chunks, &embeddings, &state).unwrap();

        let loaded = load_state(dir.path()).unwrap();
        assert_eq!(loaded.hash, "0000000000000000");
    }
}
