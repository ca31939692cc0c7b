//! Clubhouse Storage Layer
//!
//! Implements the `VectorStore` trait from `clubhouse-domain`.
//!
//! # Architecture
//!
//! - `PineconeStore`: hosted index with integrated embeddings. Chunks are
//!   upserted as text records and searched by text; Pinecone embeds both.
//! - `MemoryStore`: in-process, lexical scoring, no embeddings. Used offline
//!   and in tests.
//! - `ConfiguredStore`: whichever of the two the settings select, behind one
//!   concrete type.
//!
//! Neither store retries. Callers wrap calls in a `RetryPolicy`, using
//! `StoreError`'s `RetryableError` classification.
//!
//! # Examples
//!
//! ```
//! use clubhouse_domain::{Filter, VectorStore};
//! use clubhouse_store::MemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = MemoryStore::new();
//! let matches = store.search("clubs", "chess", 5, &Filter::new()).await.unwrap();
//! assert!(matches.is_empty());
//! # }
//! ```

#![warn(missing_docs)]

mod configured;
mod memory;
mod pinecone;
mod settings;

use clubhouse_domain::RetryableError;
use thiserror::Error;

pub use configured::ConfiguredStore;
pub use memory::MemoryStore;
pub use pinecone::PineconeStore;
pub use settings::{PineconeSettings, StoreBackend, StoreSettings};

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Store misconfigured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RetryableError for StoreError {
    fn is_transient(&self) -> bool {
        match self {
            StoreError::Communication(_) | StoreError::Timeout => true,
            StoreError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}
