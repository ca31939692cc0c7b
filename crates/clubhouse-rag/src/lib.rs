//! Clubhouse Query Engine
//!
//! Answers questions about club documents from retrieved context, with
//! numbered citations.
//!
//! # Pipeline
//!
//! 1. `FilterExtractor` infers metadata constraints ("dues under $20")
//! 2. `Retriever` searches the vector store, degrading to no matches on failure
//! 3. `ContextBuilder` numbers the matches as `[Source N]` blocks and citations
//! 4. `AnswerAssembler` prompts the LLM with the context and the question
//!
//! `RagEngine` drives the four steps and owns the query lifecycle, including
//! cancellation.
//!
//! # Configuration
//!
//! ```toml
//! [rag]
//! top_k = 5
//!
//! [rag.search_retry]
//! timeout_ms = 30000
//! max_retries = 1
//! initial_backoff_ms = 500
//! ```

#![warn(missing_docs)]

mod answer;
mod config;
mod context;
mod engine;
mod error;
mod filters;
mod retriever;

pub use answer::{user_prompt, AnswerAssembler, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE};
pub use config::RagConfig;
pub use context::{ContextBuilder, SNIPPET_CHARS};
pub use engine::{QueryOptions, RagEngine, NO_MATCH_ANSWER};
pub use error::QueryError;
pub use filters::FilterExtractor;
pub use retriever::Retriever;

#[cfg(test)]
mod tests;
