//! Clubhouse LLM Provider Layer
//!
//! Pluggable text-generation backends behind the `LlmProvider` trait from
//! `clubhouse-domain`.
//!
//! # Providers
//!
//! - `GroqProvider`: Groq's OpenAI-compatible chat completions API (free tier)
//! - `AnthropicProvider`: Anthropic Messages API
//! - `MockProvider`: deterministic responses for tests and offline use
//!
//! Providers make exactly one HTTP request per `generate` call. Timeouts and
//! retries belong to the caller's `RetryPolicy`; providers only classify
//! their failures through `RetryableError`.
//!
//! # Examples
//!
//! ```
//! use clubhouse_domain::{GenerationRequest, LlmProvider};
//! use clubhouse_llm::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = GenerationRequest {
//!     system_prompt: "Be brief.".to_string(),
//!     user_prompt: "Say hello".to_string(),
//!     temperature: 0.3,
//!     max_tokens: 100,
//! };
//! assert_eq!(provider.generate(&request).await.unwrap(), "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod factory;
pub mod groq;
mod http;

use async_trait::async_trait;
use clubhouse_domain::{GenerationRequest, LlmProvider, RetryableError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use factory::{build_provider, LlmSettings, ProviderKind};
pub use groq::GroqProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
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

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Authentication rejected
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl RetryableError for LlmError {
    fn is_transient(&self) -> bool {
        match self {
            LlmError::Communication(_) | LlmError::Timeout | LlmError::RateLimitExceeded => true,
            LlmError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Failures can be scripted to exercise retry and error paths.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::{GenerationRequest, LlmProvider};
/// use clubhouse_llm::{LlmError, MockProvider};
///
/// # #[tokio::main]
/// # async fn main() {
/// let provider = MockProvider::new("Fixed response");
/// provider.fail_next(LlmError::Timeout);
///
/// let request = GenerationRequest {
///     system_prompt: String::new(),
///     user_prompt: "any prompt".to_string(),
///     temperature: 0.0,
///     max_tokens: 10,
/// };
/// assert!(provider.generate(&request).await.is_err());
/// assert_eq!(provider.generate(&request).await.unwrap(), "Fixed response");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<VecDeque<LlmError>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Sleep before answering, to exercise timeouts and cancellation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for prompts containing `needle`
    pub fn add_response(&self, needle: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(needle.into(), response.into());
        }
    }

    /// Fail the next call with `error`. Queued failures are used in order.
    pub fn fail_next(&self, error: LlmError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(error);
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|c| *c).unwrap_or(0)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        if let Ok(mut count) = self.call_count.lock() {
            *count = 0;
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn respond(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::Other("mock state poisoned".to_string()))?;
        let response = responses
            .iter()
            .find(|(needle, _)| request.user_prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());
        Ok(response)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.failures.lock().ok().and_then(|mut f| f.pop_front());
        if let Some(error) = scripted {
            return Err(error);
        }

        self.respond(request)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
