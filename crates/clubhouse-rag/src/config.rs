//! Query engine configuration

use crate::QueryError;
use clubhouse_domain::{ConfigError, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Configuration for the RagEngine
///
/// # Examples
///
/// ```
/// use clubhouse_rag::RagConfig;
///
/// let config = RagConfig::default();
/// assert_eq!(config.top_k, 5);
/// assert!(config.system_prompt.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Matches retrieved per query unless overridden
    /// Default: 5
    pub top_k: usize,

    /// Replaces the built-in system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Timeout and retry for vector search
    pub search_retry: RetryPolicy,

    /// Timeout and retry for answer generation
    pub generation_retry: RetryPolicy,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            system_prompt: None,
            search_retry: RetryPolicy::default(),
            generation_retry: RetryPolicy::default(),
        }
    }
}

impl RagConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), QueryError> {
        validate_top_k(self.top_k)?;
        if self
            .system_prompt
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigError::Invalid("system_prompt must not be blank".to_string()).into());
        }
        self.search_retry.validate()?;
        self.generation_retry.validate()?;
        Ok(())
    }
}

pub(crate) fn validate_top_k(top_k: usize) -> Result<(), ConfigError> {
    if top_k == 0 {
        return Err(ConfigError::out_of_range("top_k", "must be greater than 0"));
    }
    Ok(())
}
