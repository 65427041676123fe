use crate::error::{KbragError, Result};
use crate::models::{Chunk, ChunkId, ChunkSource, Document};

/// Preferred break points, tried in order when a chunk boundary falls
/// mid-text: paragraph, line, sentence, word.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits document bodies into fixed-size overlapping character chunks.
///
/// Boundaries prefer natural break points near the size limit so chunks
/// do not cut words or sentences in half. Chunks inherit the document's
/// metadata and carry a stable sequence index.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    /// Maximum characters per chunk
    pub chunk_size: usize,
    /// Overlapping characters between consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkSplitter {
    /// Create a splitter with custom configuration
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(KbragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }

        if overlap >= chunk_size {
            return Err(KbragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    overlap, chunk_size
                ),
            });
        }

        Ok(Self { chunk_size, overlap })
    }

    /// Split a set of documents, preserving per-document chunk ordering
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|doc| self.split_document(doc)).collect()
    }

    /// Split a single document into chunks
    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut seq = 0u64;

        for (offset, content) in self.split_text(&document.body) {
            chunks.push(Chunk {
                id: ChunkId::derive(&document.source, seq),
                content,
                source: ChunkSource {
                    document: document.source.clone(),
                    seq,
                    offset,
                },
                metadata: document.metadata.clone(),
            });
            seq += 1;
        }

        chunks
    }

    /// Split raw text into (offset, content) pieces.
    ///
    /// Offsets are byte positions into the input; every piece is at most
    /// `chunk_size` bytes and whitespace-only pieces are dropped.
    fn split_text(&self, text: &str) -> Vec<(usize, String)> {
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let end = if text.len() - start <= self.chunk_size {
                text.len()
            } else {
                self.find_break(text, start)
            };

            let piece = &text[start..end];
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                let lead = piece.len() - piece.trim_start().len();
                pieces.push((start + lead, trimmed.to_string()));
            }

            if end >= text.len() {
                break;
            }

            // Step back by the overlap, but always make forward progress.
            let mut next = floor_char_boundary(text, end.saturating_sub(self.overlap));
            if next <= start {
                next = end;
            }
            start = next;
        }

        pieces
    }

    /// Find a break position in `(start, start + chunk_size]`, preferring
    /// a separator in the back half of the window.
    fn find_break(&self, text: &str, start: usize) -> usize {
        let hard_end = floor_char_boundary(text, start + self.chunk_size);
        let window_start = floor_char_boundary(text, start + self.chunk_size / 2);

        let window = &text[window_start..hard_end];
        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                return window_start + pos + sep.len();
            }
        }

        // No natural break; cut at the size limit.
        if hard_end > start {
            hard_end
        } else {
            // Pathological case: a single multi-byte char wider than the
            // window. Take the whole char.
            ceil_char_boundary(text, start + 1)
        }
    }
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocMetadata;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn test_document(body: &str) -> Document {
        Document {
            source: "test.txt".to_string(),
            path: PathBuf::from("test.txt"),
            metadata: DocMetadata {
                author: Some("Test Author".to_string()),
                topic: Some("Testing".to_string()),
                ..Default::default()
            },
            body: body.to_string(),
        }
    }

    fn long_body() -> String {
        "This is a sentence about testing. ".repeat(40)
    }

    #[test]
    fn test_splitter_default() {
        let splitter = ChunkSplitter::default();
        assert_eq!(splitter.chunk_size, 500);
        assert_eq!(splitter.overlap, 50);
    }

    #[test]
    fn test_splitter_rejects_zero_chunk_size() {
        assert!(ChunkSplitter::new(0, 0).is_err());
    }

    #[test]
    fn test_splitter_rejects_overlap_ge_chunk_size() {
        assert!(ChunkSplitter::new(100, 100).is_err());
        assert!(ChunkSplitter::new(100, 150).is_err());
    }

    #[test]
    fn test_split_creates_multiple_chunks() {
        let splitter = ChunkSplitter::new(100, 20).unwrap();
        let doc = test_document(&long_body());

        let chunks = splitter.split_document(&doc);
        assert!(chunks.len() > 1);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let splitter = ChunkSplitter::new(100, 10).unwrap();
        let doc = test_document(&long_body());

        for chunk in splitter.split_document(&doc) {
            assert!(chunk.content.len() <= 100, "chunk too large: {}", chunk.content.len());
        }
    }

    #[test]
    fn test_chunks_inherit_metadata() {
        let splitter = ChunkSplitter::new(100, 20).unwrap();
        let doc = test_document(&long_body());

        for chunk in splitter.split_document(&doc) {
            assert_eq!(chunk.metadata.author.as_deref(), Some("Test Author"));
            assert_eq!(chunk.source.document, "test.txt");
        }
    }

    #[test]
    fn test_chunk_ordering_is_stable() {
        let splitter = ChunkSplitter::new(100, 20).unwrap();
        let doc = test_document(&long_body());

        let chunks = splitter.split_document(&doc);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.source.seq, i as u64);
        }
        for pair in chunks.windows(2) {
            assert!(pair[0].source.offset < pair[1].source.offset);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let splitter = ChunkSplitter::new(80, 20).unwrap();
        // Uniform words so break points land on spaces
        let doc = test_document(&"word ".repeat(100));

        let chunks = splitter.split_document(&doc);
        assert!(chunks.len() > 1);

        let body = &doc.body;
        for pair in chunks.windows(2) {
            let prev_end = pair[0].source.offset + pair[0].content.len();
            assert!(
                pair[1].source.offset <= prev_end,
                "expected overlap: next starts at {} but previous ends at {}",
                pair[1].source.offset,
                prev_end
            );
        }
        // Offsets point back into the original body
        for chunk in &chunks {
            assert_eq!(
                &body[chunk.source.offset..chunk.source.offset + chunk.content.len()],
                chunk.content
            );
        }
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let splitter = ChunkSplitter::default();
        let doc = test_document("A short note.");

        let chunks = splitter.split_document(&doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "A short note.");
    }

    #[test]
    fn test_empty_body_yields_no_chunks() {
        let splitter = ChunkSplitter::default();
        assert!(splitter.split_document(&test_document("")).is_empty());
        assert!(splitter.split_document(&test_document("   \n\n  ")).is_empty());
    }

    #[test]
    fn test_split_documents_spans_collection() {
        let splitter = ChunkSplitter::new(100, 20).unwrap();
        let mut doc_a = test_document(&long_body());
        doc_a.source = "a.txt".to_string();
        let mut doc_b = test_document(&long_body());
        doc_b.source = "b.txt".to_string();

        let chunks = splitter.split_documents(&[doc_a, doc_b]);
        assert!(chunks.iter().any(|c| c.source.document == "a.txt"));
        assert!(chunks.iter().any(|c| c.source.document == "b.txt"));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let splitter = ChunkSplitter::new(20, 5).unwrap();
        let doc = test_document(&"héllo wörld ühm ".repeat(30));

        for chunk in splitter.split_document(&doc) {
            assert!(!chunk.content.is_empty());
        }
    }

    proptest! {
        #[test]
        fn prop_chunks_never_exceed_size(
            body in "[ a-zA-Z\\n.]{0,2000}",
            chunk_size in 10usize..200,
            overlap in 0usize..9,
        ) {
            let splitter = ChunkSplitter::new(chunk_size, overlap).unwrap();
            let doc = test_document(&body);

            for chunk in splitter.split_document(&doc) {
                prop_assert!(chunk.content.len() <= chunk_size);
                prop_assert!(!chunk.content.trim().is_empty());
            }
        }

        #[test]
        fn prop_chunk_seq_is_contiguous(
            body in "[ a-z\\n.]{0,2000}",
            chunk_size in 10usize..200,
        ) {
            let splitter = ChunkSplitter::new(chunk_size, chunk_size / 4).unwrap();
            let doc = test_document(&body);

            let chunks = splitter.split_document(&doc);
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.source.seq, i as u64);
            }
        }
    }
}
