//! Error types for query processing

use clubhouse_domain::ConfigError;
use thiserror::Error;

/// Errors that can end a query
///
/// A failed search is not among them: the retriever degrades to an empty
/// result and the query still completes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The LLM call failed after retries
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// The caller cancelled the query
    #[error("Query cancelled")]
    Cancelled,

    /// Invalid configuration or options
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
