//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration value
    #[error(transparent)]
    InvalidConfig(#[from] clubhouse_domain::ConfigError),

    /// Ingestion error
    #[error(transparent)]
    Indexer(#[from] clubhouse_indexer::IndexerError),

    /// Query error
    #[error(transparent)]
    Query(#[from] clubhouse_rag::QueryError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] clubhouse_llm::LlmError),

    /// Vector store error
    #[error("Store error: {0}")]
    Store(#[from] clubhouse_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
