//! Clubhouse Indexer
//!
//! Batch ingestion: turns a directory of club documents into chunks and
//! writes them to a vector store.
//!
//! # Overview
//!
//! The Indexer is responsible for:
//! - **Discovery**: walking the input directory for PDF and text files
//! - **Processing**: running each document through the `DocumentProcessor`
//!   on a bounded worker pool
//! - **Upsert**: writing chunks in batches, each under a retry policy
//! - **Reporting**: collecting an `IngestionSummary` of what succeeded and failed
//!
//! A bad document or a rejected batch never aborts the run. Only an invalid
//! configuration or a missing input directory does.
//!
//! # Usage
//!
//! ```no_run
//! use clubhouse_extractor::ChunkingConfig;
//! use clubhouse_indexer::{Indexer, IndexerConfig};
//! use clubhouse_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let indexer = Indexer::new(
//!         IndexerConfig::default(),
//!         &ChunkingConfig::default(),
//!         MemoryStore::new(),
//!         "clubs",
//!     )?;
//!
//!     let summary = indexer.ingest().await?;
//!     println!("{}", summary.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [indexer]
//! input_dir = "data/raw"
//! batch_size = 100
//! workers = 4
//!
//! [indexer.retry]
//! timeout_ms = 30000
//! max_retries = 1
//! initial_backoff_ms = 500
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod indexer;
mod summary;

pub use config::IndexerConfig;
pub use error::IndexerError;
pub use indexer::Indexer;
pub use summary::{BatchFailure, DocumentFailure, IngestionSummary};
