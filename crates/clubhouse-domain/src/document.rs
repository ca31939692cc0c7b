//! Raw documents as they enter the ingestion pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// UTF-8 plain text (including markdown)
    Text,
}

impl DocumentFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Text => "text",
        }
    }

    /// Infer the format from a file extension (case-insensitive)
    ///
    /// Returns `None` for unsupported extensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("club.PDF"), Some(DocumentFormat::Pdf));
    /// assert_eq!(DocumentFormat::from_path("notes.txt"), Some(DocumentFormat::Text));
    /// assert_eq!(DocumentFormat::from_path("budget.xlsx"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" | "md" => Some(DocumentFormat::Text),
            _ => None,
        }
    }
}

/// A source document, read but not yet processed.
///
/// Immutable; lives for exactly one ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Source file name (used as the fallback identity and in citations)
    pub source: String,

    /// Undecoded file content
    pub content: Vec<u8>,

    /// Content format
    pub format: DocumentFormat,
}

impl RawDocument {
    /// Create a new raw document
    pub fn new(source: impl Into<String>, content: impl Into<Vec<u8>>, format: DocumentFormat) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            format,
        }
    }

    /// Convenience constructor for in-memory plain text
    pub fn text(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, text.into().into_bytes(), DocumentFormat::Text)
    }
}
