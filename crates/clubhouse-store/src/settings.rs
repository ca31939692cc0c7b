//! Store configuration

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which store backs the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted Pinecone index
    #[default]
    Pinecone,
    /// In-process store, lost on exit
    Memory,
}

/// Connection settings for a Pinecone index with integrated embeddings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeSettings {
    /// Index host, e.g. `https://clubs-abc123.svc.us-east-1.pinecone.io`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// API key; normally supplied through PINECONE_API_KEY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Record field the index embeds
    pub text_field: String,

    /// Value of the X-Pinecone-API-Version header
    pub api_version: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for PineconeSettings {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            text_field: "text".to_string(),
            api_version: "2025-01".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl PineconeSettings {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Store configuration section
///
/// # Examples
///
/// ```
/// use clubhouse_store::{StoreBackend, StoreSettings};
///
/// let settings = StoreSettings::default();
/// assert_eq!(settings.backend, StoreBackend::Pinecone);
/// assert_eq!(settings.namespace, "clubs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend selection
    pub backend: StoreBackend,

    /// Namespace chunks are written to and searched in
    pub namespace: String,

    /// Pinecone connection, used when `backend = "pinecone"`
    pub pinecone: PineconeSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Pinecone,
            namespace: "clubs".to_string(),
            pinecone: PineconeSettings::default(),
        }
    }
}

impl StoreSettings {
    /// Validate the selected backend's settings
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.namespace.trim().is_empty() {
            return Err(StoreError::Config("namespace must not be empty".to_string()));
        }
        if self.backend == StoreBackend::Pinecone {
            if self.pinecone.host.as_deref().map_or(true, |h| h.trim().is_empty()) {
                return Err(StoreError::Config("Pinecone host is required (PINECONE_HOST)".to_string()));
            }
            if self.pinecone.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                return Err(StoreError::Config(
                    "Pinecone API key is required (PINECONE_API_KEY)".to_string(),
                ));
            }
            if self.pinecone.request_timeout_secs == 0 {
                return Err(StoreError::Config("request_timeout_secs must be greater than 0".to_string()));
            }
        }
        Ok(())
    }
}
