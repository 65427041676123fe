use crate::error::{KbragError, Result};
use crate::models::{DocMetadata, Document};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads plain-text documents from a directory.
///
/// Documents may start with a metadata header delimited by `---` lines:
///
/// ```text
/// ---
/// Author: Name
/// Date: 2025-01-08
/// Topic: Topic Name
/// Summary: Brief summary
/// ---
/// Body text...
/// ```
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    directory: PathBuf,
}

impl DocumentLoader {
    /// Create a loader for the given directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Directory this loader reads from
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load all `.txt` documents from the directory.
    ///
    /// Files are visited in name order so chunk IDs stay deterministic
    /// across runs. Unreadable files are skipped with a warning; a missing
    /// directory is an error.
    pub fn load(&self) -> Result<Vec<Document>> {
        if !self.directory.exists() {
            return Err(KbragError::DocumentDirNotFound {
                path: self.directory.clone(),
            });
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        tracing::info!(count = paths.len(), directory = %self.directory.display(), "Found documents");

        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                    continue;
                }
            };

            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let (metadata, body) = parse_metadata(&raw);

            tracing::debug!(
                source = %source,
                author = metadata.author_or_unknown(),
                topic = metadata.topic_or_unknown(),
                "Loaded document"
            );

            documents.push(Document {
                source,
                path,
                metadata,
                body,
            });
        }

        Ok(documents)
    }
}

/// Parse an optional `---` delimited metadata header.
///
/// Returns the parsed metadata and the content with the header stripped.
/// Content without a well-formed header yields empty metadata and the
/// input unchanged.
pub fn parse_metadata(content: &str) -> (DocMetadata, String) {
    let mut metadata = DocMetadata::default();

    if content.starts_with("---") {
        let mut parts = content.splitn(3, "---");
        parts.next(); // leading empty segment

        if let (Some(header), Some(rest)) = (parts.next(), parts.next()) {
            for line in header.lines() {
                let Some((key, value)) = line.split_once(':') else {
                    continue;
                };
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();

                match key.as_str() {
                    "author" => metadata.author = Some(value),
                    "topic" => metadata.topic = Some(value),
                    "date" => metadata.date = Some(value),
                    "summary" => metadata.summary = Some(value),
                    _ => {
                        metadata.extra.insert(key, value);
                    }
                }
            }

            return (metadata, rest.trim().to_string());
        }
    }

    (metadata, content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\n\
        Author: Test Author\n\
        Date: 2025-01-08\n\
        Topic: Testing\n\
        Summary: A test document.\n\
        ---\n\n\
        This is the actual content of the test document.";

    #[test]
    fn test_parse_metadata_extracts_all_fields() {
        let (metadata, _) = parse_metadata(SAMPLE);

        assert_eq!(metadata.author.as_deref(), Some("Test Author"));
        assert_eq!(metadata.date.as_deref(), Some("2025-01-08"));
        assert_eq!(metadata.topic.as_deref(), Some("Testing"));
        assert_eq!(metadata.summary.as_deref(), Some("A test document."));
    }

    #[test]
    fn test_parse_metadata_strips_header() {
        let (_, content) = parse_metadata(SAMPLE);

        assert!(content.contains("actual content"));
        assert!(!content.contains("---"));
        assert!(!content.contains("Author:"));
    }

    #[test]
    fn test_parse_metadata_no_header() {
        let content = "Just plain content without any header at all.";
        let (metadata, result) = parse_metadata(content);

        assert!(metadata.is_empty());
        assert_eq!(result, content);
    }

    #[test]
    fn test_parse_metadata_empty_content() {
        let (metadata, result) = parse_metadata("");

        assert!(metadata.is_empty());
        assert_eq!(result, "");
    }

    #[test]
    fn test_parse_metadata_unknown_keys_go_to_extra() {
        let content = "---\nAuthor: A\nLanguage: en\n---\nBody";
        let (metadata, _) = parse_metadata(content);

        assert_eq!(metadata.author.as_deref(), Some("A"));
        assert_eq!(metadata.extra.get("language").map(String::as_str), Some("en"));
    }

    #[test]
    fn test_parse_metadata_keys_are_lowercased() {
        let content = "---\nAUTHOR: Shouty\n---\nBody";
        let (metadata, _) = parse_metadata(content);

        assert_eq!(metadata.author.as_deref(), Some("Shouty"));
    }

    #[test]
    fn test_parse_metadata_unterminated_header_left_intact() {
        let content = "---\nAuthor: A\nNo closing delimiter";
        let (metadata, result) = parse_metadata(content);

        assert!(metadata.is_empty());
        assert_eq!(result, content);
    }
}
