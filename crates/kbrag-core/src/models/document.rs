use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// A loaded document: parsed metadata plus raw text body.
///
/// Created at load time and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source file name (e.g. "python_basics.txt")
    pub source: String,

    /// Full path to the source file
    pub path: PathBuf,

    /// Metadata parsed from the document header
    pub metadata: DocMetadata,

    /// Document body with the metadata header stripped
    pub body: String,
}

impl Document {
    /// Word count of the document body
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// Metadata parsed from a document's `---` delimited header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    pub author: Option<String>,
    pub topic: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,

    /// Header keys that are not one of the known fields
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl DocMetadata {
    /// Author, or "Unknown" when the header did not provide one
    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }

    /// Topic, or "Unknown" when the header did not provide one
    pub fn topic_or_unknown(&self) -> &str {
        self.topic.as_deref().unwrap_or("Unknown")
    }

    /// True when no header field was set
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.topic.is_none()
            && self.date.is_none()
            && self.summary.is_none()
            && self.extra.is_empty()
    }
}

/// Aggregate statistics over a loaded document collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_documents: usize,
    pub unique_authors: usize,
    pub authors: Vec<String>,
    pub topics: Vec<String>,
    pub total_words: usize,
    pub avg_words_per_doc: usize,
    pub avg_chars_per_doc: usize,
}

impl DocumentStats {
    /// Compute statistics for a set of loaded documents
    pub fn compute(documents: &[Document]) -> Self {
        if documents.is_empty() {
            return Self::default();
        }

        let mut authors = BTreeSet::new();
        let mut topics = BTreeSet::new();
        let mut total_chars = 0;
        let mut total_words = 0;

        for doc in documents {
            authors.insert(doc.metadata.author_or_unknown().to_string());
            topics.insert(doc.metadata.topic_or_unknown().to_string());
            total_chars += doc.body.len();
            total_words += doc.word_count();
        }

        Self {
            total_documents: documents.len(),
            unique_authors: authors.len(),
            authors: authors.into_iter().collect(),
            topics: topics.into_iter().collect(),
            total_words,
            avg_words_per_doc: total_words / documents.len(),
            avg_chars_per_doc: total_chars / documents.len(),
        }
    }
}
