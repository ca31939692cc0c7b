//! Error types for document processing

use clubhouse_domain::ConfigError;
use thiserror::Error;

/// Errors that can occur while turning a raw document into chunks
///
/// All of these are per-document: the indexer logs them, skips the
/// document, and moves on.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Document bytes are not valid UTF-8
    #[error("Encoding error in {0}: not valid UTF-8")]
    Encoding(String),

    /// PDF text extraction failed
    #[error("PDF extraction failed for {source_file}: {reason}")]
    Pdf {
        /// Offending file
        source_file: String,
        /// Underlying parser message
        reason: String,
    },

    /// Format the extractor cannot read
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Document yielded no text after cleaning
    #[error("No text found in {0}")]
    EmptyText(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
