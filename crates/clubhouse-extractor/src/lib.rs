//! Clubhouse Extractor
//!
//! Turns raw club documents into retrieval-ready chunks.
//!
//! # Overview
//!
//! Every document passes through the same pure pipeline:
//!
//! ```text
//! RawDocument → TextExtractor → TextCleaner → MetadataExtractor
//!                                           → TextChunker → ChunkAssembler → Vec<Chunk>
//! ```
//!
//! - **TextExtractor**: bytes to UTF-8 text (plain text or PDF)
//! - **TextCleaner**: strips page footers and pagination, collapses whitespace
//! - **MetadataExtractor**: rule-based club name, dues, meeting frequency,
//!   revision date, and membership requirements
//! - **TextChunker**: token-bounded chunks with overlap
//! - **ChunkAssembler**: metadata, positions, and deterministic ids
//!
//! Nothing here performs I/O beyond decoding the bytes it is handed, so every
//! stage is testable in isolation and safe to run on blocking worker threads.
//!
//! # Example Usage
//!
//! ```
//! use clubhouse_domain::RawDocument;
//! use clubhouse_extractor::{ChunkingConfig, DocumentProcessor};
//!
//! let processor = DocumentProcessor::from_config(&ChunkingConfig::default()).unwrap();
//! let doc = RawDocument::text(
//!     "accessibility.txt",
//!     "The name of this organization shall be the Accessibility Club. \
//!      The organization shall host meetings at least once every 2 months.",
//! );
//!
//! let processed = processor.process(&doc).unwrap();
//! assert_eq!(processed.metadata.club_name.as_deref(), Some("Accessibility Club"));
//! assert_eq!(processed.metadata.meeting_frequency.as_deref(), Some("every 2 months"));
//! ```

#![warn(missing_docs)]

mod assembler;
mod chunking;
mod cleaner;
mod config;
mod error;
mod metadata;
mod processor;
mod text;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use assembler::{sanitize, short_hash, ChunkAssembler};
pub use chunking::TextChunker;
pub use cleaner::TextCleaner;
pub use config::ChunkingConfig;
pub use error::ExtractionError;
pub use metadata::MetadataExtractor;
pub use processor::{DocumentProcessor, ProcessedDocument};
pub use text::TextExtractor;
pub use tokenizer::WordTokenizer;
