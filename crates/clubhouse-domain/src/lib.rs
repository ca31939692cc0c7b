//! Clubhouse Domain Layer
//!
//! Core data model and capability traits shared by every other Clubhouse crate.
//! The ingestion pipeline and the query engine only ever talk to the outside
//! world (vector store, LLM) through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **RawDocument**: a club document as read from disk, before any processing
//! - **Metadata**: structured fields pulled from a document (club name, dues, ...)
//! - **Chunk**: a bounded, overlapping span of document text plus its metadata
//! - **Filter**: structured retrieval constraints inferred from a question
//! - **Citation**: a numbered reference tying an answer back to a retrieved chunk
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure implementations live in other crates
//! - `RetryPolicy` is the single place where external-call timeouts and
//!   retries are decided

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod document;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod query;
pub mod retry;
pub mod traits;

// Re-exports for convenience
pub use chunk::Chunk;
pub use document::{DocumentFormat, RawDocument};
pub use error::ConfigError;
pub use filter::{Filter, FilterOp, FilterValue, Predicate};
pub use metadata::{ChunkMetadata, Metadata};
pub use query::{Citation, QueryId, QueryResponse, QueryStage, SearchMatch};
pub use retry::{CallError, RetryPolicy};
pub use traits::{GenerationRequest, LlmProvider, RetryableError, Tokenizer, VectorStore};
