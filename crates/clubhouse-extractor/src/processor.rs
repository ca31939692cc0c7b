//! Single-document ingestion pipeline

use crate::{
    ChunkAssembler, ChunkingConfig, ExtractionError, MetadataExtractor, TextChunker, TextCleaner,
    TextExtractor,
};
use clubhouse_domain::{Chunk, Metadata, RawDocument, Tokenizer};

/// Output of processing one document
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    /// Document-level metadata
    pub metadata: Metadata,
    /// Chunks in document order
    pub chunks: Vec<Chunk>,
}

/// Runs extract → clean → metadata → chunk → assemble for one document
///
/// Stateless apart from compiled rules, so one processor can be shared
/// across worker threads.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::RawDocument;
/// use clubhouse_extractor::{ChunkingConfig, DocumentProcessor};
///
/// let processor = DocumentProcessor::from_config(&ChunkingConfig::default()).unwrap();
/// let doc = RawDocument::text("chess.txt", "The Chess Club meets weekly. Dues are $5.");
/// let processed = processor.process(&doc).unwrap();
/// assert_eq!(processed.chunks.len(), 1);
/// assert_eq!(processed.metadata.dues, Some(5.0));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentProcessor<T: Tokenizer = crate::WordTokenizer> {
    extractor: TextExtractor,
    metadata: MetadataExtractor,
    chunker: TextChunker<T>,
}

impl DocumentProcessor {
    /// Build a processor with the default tokenizer
    pub fn from_config(config: &ChunkingConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self::new(TextChunker::from_config(config)?))
    }
}

impl<T: Tokenizer> DocumentProcessor<T> {
    /// Create a processor around an existing chunker
    pub fn new(chunker: TextChunker<T>) -> Self {
        Self {
            extractor: TextExtractor::new(),
            metadata: MetadataExtractor::new(),
            chunker,
        }
    }

    /// Process a document into metadata and chunks
    pub fn process(&self, document: &RawDocument) -> Result<ProcessedDocument, ExtractionError> {
        let raw = self.extractor.extract(document)?;
        let cleaned = TextCleaner::clean(&raw);
        if cleaned.is_empty() {
            return Err(ExtractionError::EmptyText(document.source.clone()));
        }

        let mut metadata = self.metadata.extract(&cleaned, &document.source);
        if metadata.last_updated.is_none() {
            metadata.last_updated = TextCleaner::footer_date(&raw);
        }

        let texts = self.chunker.chunk(&cleaned);
        let chunks = ChunkAssembler::assemble(texts, &metadata);

        tracing::info!(
            source = %document.source,
            club = metadata.club_name.as_deref().unwrap_or("-"),
            chunks = chunks.len(),
            "Processed document"
        );

        Ok(ProcessedDocument { metadata, chunks })
    }
}
