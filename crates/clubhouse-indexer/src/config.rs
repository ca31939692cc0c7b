//! Configuration for ingestion runs

use crate::IndexerError;
use clubhouse_domain::{ConfigError, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Indexer
///
/// # Examples
///
/// ```
/// use clubhouse_indexer::IndexerConfig;
///
/// let config = IndexerConfig::default();
/// assert_eq!(config.batch_size, 100);
/// assert_eq!(config.workers, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Directory scanned by `ingest`
    /// Default: data/raw
    pub input_dir: PathBuf,

    /// Chunks per upsert request
    /// Default: 100
    pub batch_size: usize,

    /// Documents processed concurrently
    /// Default: 4
    pub workers: usize,

    /// Timeout and retry for each upsert batch
    pub retry: RetryPolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            batch_size: 100,
            workers: 4,
            retry: RetryPolicy::default(),
        }
    }
}

impl IndexerConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.batch_size == 0 {
            return Err(ConfigError::out_of_range("batch_size", "must be greater than 0").into());
        }
        if self.workers == 0 {
            return Err(ConfigError::out_of_range("workers", "must be greater than 0").into());
        }
        self.retry.validate()?;
        Ok(())
    }
}
