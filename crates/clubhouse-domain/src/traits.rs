//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Chunk, Filter, SearchMatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Classifies failures of external calls for the retry policy
pub trait RetryableError: std::error::Error + Send + Sync + 'static {
    /// Whether retrying the same call may succeed (network, timeout, 429, 5xx)
    fn is_transient(&self) -> bool;
}

/// Trait for storing and searching chunks
///
/// Implemented by the infrastructure layer (clubhouse-store)
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Error type for store operations
    type Error: RetryableError;

    /// Insert or overwrite chunks by id. Returns the number written.
    async fn upsert(&self, namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error>;

    /// Return up to `top_k` matches for `query`, best first, restricted by `filter`
    async fn search(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
        filter: &Filter,
    ) -> Result<Vec<SearchMatch>, Self::Error>;

    /// Remove every chunk in `namespace`
    async fn delete_namespace(&self, namespace: &str) -> Result<(), Self::Error>;
}

#[async_trait]
impl<S: VectorStore + ?Sized> VectorStore for Arc<S> {
    type Error = S::Error;

    async fn upsert(&self, namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error> {
        (**self).upsert(namespace, chunks).await
    }

    async fn search(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
        filter: &Filter,
    ) -> Result<Vec<SearchMatch>, Self::Error> {
        (**self).search(namespace, query, top_k, filter).await
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), Self::Error> {
        (**self).delete_namespace(namespace).await
    }
}

/// A single text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Instruction governing the model's behavior
    pub system_prompt: String,
    /// Context plus question
    pub user_prompt: String,
    /// Sampling temperature in `[0, 2]`
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (clubhouse-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: RetryableError;

    /// Generate a completion for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error>;

    /// Provider name, for logging
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Box<P> {
    type Error = P::Error;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        (**self).generate(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Splits text into tokens, reported as byte ranges into the input
///
/// Ranges must be non-overlapping, ascending, and fall on char boundaries.
pub trait Tokenizer: Send + Sync {
    /// Byte ranges of each token in `text`
    fn token_spans(&self, text: &str) -> Vec<Range<usize>>;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> usize {
        self.token_spans(text).len()
    }
}
