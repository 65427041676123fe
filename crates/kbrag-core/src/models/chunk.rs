use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::DocMetadata;

/// Unique identifier for a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub u64);

impl ChunkId {
    /// Derive a deterministic chunk ID from the source document and the
    /// chunk's sequence index within it.
    pub fn derive(source: &str, seq: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        seq.hash(&mut hasher);
        ChunkId(hasher.finish())
    }
}

/// A bounded-size slice of a document used as the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier
    pub id: ChunkId,

    /// Text content
    pub content: String,

    /// Source information
    pub source: ChunkSource,

    /// Metadata inherited from the source document
    pub metadata: DocMetadata,
}

/// Where a chunk came from within its document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Source document file name
    pub document: String,

    /// Sequence index of the chunk within the document
    pub seq: u64,

    /// Character offset of the chunk start in the document body
    pub offset: usize,
}

/// Embedding vector associated one-to-one with a chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Associated chunk ID
    pub chunk_id: ChunkId,

    /// Embedding vector
    pub vector: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_deterministic() {
        let a = ChunkId::derive("notes.txt", 3);
        let b = ChunkId::derive("notes.txt", 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_chunk_id_unique() {
        let a = ChunkId::derive("notes.txt", 3);
        let b = ChunkId::derive("notes.txt", 4);
        let c = ChunkId::derive("other.txt", 3);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
