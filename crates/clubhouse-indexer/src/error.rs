//! Error types for ingestion runs

use clubhouse_domain::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an ingestion run
///
/// Failures of individual documents or batches are not errors; they are
/// recorded in the `IngestionSummary`.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input directory missing or unreadable
    #[error("Cannot read input directory {path}: {source}")]
    Io {
        /// Directory that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Clearing the namespace failed
    #[error("Storage error: {0}")]
    Store(String),
}

impl From<clubhouse_extractor::ExtractionError> for IndexerError {
    fn from(e: clubhouse_extractor::ExtractionError) -> Self {
        match e {
            clubhouse_extractor::ExtractionError::Config(config) => IndexerError::Config(config),
            other => IndexerError::Config(ConfigError::Invalid(other.to_string())),
        }
    }
}
