//! Raw text extraction from document bytes

use crate::ExtractionError;
use clubhouse_domain::{DocumentFormat, RawDocument};

/// Turns a [`RawDocument`] into plain UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract text according to the document's format
    ///
    /// Fails on invalid UTF-8, PDF parser errors, and documents whose text
    /// is blank.
    pub fn extract(&self, document: &RawDocument) -> Result<String, ExtractionError> {
        let text = match document.format {
            DocumentFormat::Text => extract_utf8(document)?,
            DocumentFormat::Pdf => extract_pdf(document)?,
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText(document.source.clone()));
        }

        tracing::debug!(
            source = %document.source,
            format = document.format.as_str(),
            chars = text.len(),
            "Extracted text"
        );
        Ok(text)
    }
}

fn extract_utf8(document: &RawDocument) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(&document.content)
        .map_err(|_| ExtractionError::Encoding(document.source.clone()))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

fn extract_pdf(document: &RawDocument) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(&document.content).map_err(|e| ExtractionError::Pdf {
        source_file: document.source.clone(),
        reason: e.to_string(),
    })
}
