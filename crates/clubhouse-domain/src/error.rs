//! Configuration errors shared across crates

use thiserror::Error;

/// An invalid configuration value.
///
/// Configuration errors are fatal at startup: they are raised by `validate()`
/// or by constructors, never while processing an individual document or query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Overlap must be strictly smaller than the chunk size
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge {
        /// Configured chunk size in tokens
        size: usize,
        /// Configured overlap in tokens
        overlap: usize,
    },

    /// A value is outside its allowed range
    #[error("{field} is out of range: {reason}")]
    OutOfRange {
        /// Name of the offending option
        field: &'static str,
        /// Human-readable constraint
        reason: String,
    },

    /// A required value is missing
    #[error("missing required configuration value: {0}")]
    Missing(String),

    /// A value could not be interpreted
    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::OutOfRange`]
    pub fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::OutOfRange {
            field,
            reason: reason.into(),
        }
    }
}
