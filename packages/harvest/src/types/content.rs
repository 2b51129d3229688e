//! Raw fetched content - the content-addressed archive rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// How the raw bytes were retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Webpage,
    Pdf,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webpage => "webpage",
            Self::Pdf => "pdf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "webpage" => Some(Self::Webpage),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Whether extraction has run over this content yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Completed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Raw extracted text for a fetched source, immutable once stored.
///
/// `content_hash` is the dedup key: a second fetch of byte-identical
/// content reuses the existing row. This is the pipeline's idempotence
/// anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContent {
    pub id: Uuid,

    /// URL the content was fetched from
    pub source_url: String,

    /// Retrieval branch that produced it
    pub source_kind: SourceKind,

    /// Extracted text (markdown for pages, plain text for PDFs)
    pub body: String,

    /// SHA-256 hex digest of `body`
    pub content_hash: String,

    /// Local cache path for downloaded documents
    pub file_path: Option<String>,

    /// Size of the downloaded file in bytes
    pub file_size_bytes: Option<u64>,

    /// Page count for paginated documents
    pub page_count: Option<u32>,

    /// Tool that produced the text ("firecrawl", "pdf-extract", ...)
    pub extraction_method: String,

    /// Whitespace-delimited word count of `body`
    pub word_count: u64,

    /// Extraction lifecycle status
    pub processing_status: ProcessingStatus,

    /// When the content was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RawContent {
    /// Create a new pending row, computing hash and word count.
    pub fn new(
        source_url: impl Into<String>,
        source_kind: SourceKind,
        body: impl Into<String>,
        extraction_method: impl Into<String>,
    ) -> Self {
        let body = body.into();
        let content_hash = hash_text(&body);
        let word_count = body.split_whitespace().count() as u64;

        Self {
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            source_kind,
            body,
            content_hash,
            file_path: None,
            file_size_bytes: None,
            page_count: None,
            extraction_method: extraction_method.into(),
            word_count,
            processing_status: ProcessingStatus::Pending,
            fetched_at: Utc::now(),
        }
    }

    /// Attach local file details (for downloaded documents).
    pub fn with_file(mut self, path: impl Into<String>, size_bytes: u64) -> Self {
        self.file_path = Some(path.into());
        self.file_size_bytes = Some(size_bytes);
        self
    }

    /// Set the page count.
    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }
}

/// SHA-256 hex digest of a text body.
pub fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_text("hello"), hash_text("hello"));
        assert_ne!(hash_text("hello"), hash_text("hello "));
        assert_eq!(hash_text("hello").len(), 64);
    }

    #[test]
    fn test_new_content_computes_derived_fields() {
        let content = RawContent::new(
            "https://example.gov.au/report",
            SourceKind::Webpage,
            "one two three",
            "firecrawl",
        );
        assert_eq!(content.word_count, 3);
        assert_eq!(content.content_hash, hash_text("one two three"));
        assert_eq!(content.processing_status, ProcessingStatus::Pending);
    }

    #[test]
    fn test_identical_bodies_share_hash() {
        let a = RawContent::new("https://a.example", SourceKind::Webpage, "body", "firecrawl");
        let b = RawContent::new("https://b.example", SourceKind::Pdf, "body", "pdf-extract");
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.id, b.id);
    }
}
