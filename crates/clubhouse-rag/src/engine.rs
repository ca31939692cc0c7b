//! Query lifecycle

use crate::config::validate_top_k;
use crate::{AnswerAssembler, ContextBuilder, FilterExtractor, QueryError, RagConfig, Retriever};
use clubhouse_domain::{ConfigError, Filter, LlmProvider, QueryId, QueryResponse, QueryStage, VectorStore};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Answer returned when retrieval finds nothing
pub const NO_MATCH_ANSWER: &str = "I couldn't find any relevant information in the club database to answer \
                                   your question. Please try rephrasing or ask about a specific club.";

/// Per-query options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Overrides the configured `top_k`
    pub top_k: Option<usize>,
    /// Infer a filter from the question
    pub apply_filters: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            apply_filters: true,
        }
    }
}

/// How the filter for a query is chosen
enum FilterSource {
    Inferred,
    Disabled,
    Explicit(Filter),
}

/// Retrieval-augmented question answering over a club index
///
/// Each query runs `Received → FiltersExtracted → Retrieved → ContextBuilt →
/// Generated → Completed` inside a `query` span carrying its `QueryId`.
/// Queries share nothing mutable, so one engine can serve many concurrent
/// callers behind an `Arc`.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::{Chunk, ChunkMetadata, Metadata, VectorStore};
/// use clubhouse_llm::MockProvider;
/// use clubhouse_rag::{RagConfig, RagEngine};
/// use clubhouse_store::MemoryStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// store.upsert("clubs", &[Chunk {
///     id: "chess_0".to_string(),
///     text: "The Chess Club meets every Tuesday.".to_string(),
///     metadata: ChunkMetadata {
///         document: Metadata::for_source("chess_club.txt"),
///         chunk_index: 0,
///         total_chunks: 1,
///     },
/// }]).await?;
///
/// let llm = MockProvider::new("It meets every Tuesday [Source 1].");
/// let engine = RagEngine::new(RagConfig::default(), store, llm, "clubs")?;
/// let response = engine.query("When does the chess club meet?").await?;
/// assert_eq!(response.citations[0].club_name, "Chess Club");
/// # Ok(())
/// # }
/// ```
pub struct RagEngine<S: VectorStore, L: LlmProvider> {
    config: RagConfig,
    filters: FilterExtractor,
    retriever: Retriever<S>,
    answers: AnswerAssembler,
    llm: L,
}

impl<S: VectorStore, L: LlmProvider> RagEngine<S, L> {
    /// Create an engine searching `namespace` of `store`
    pub fn new(config: RagConfig, store: S, llm: L, namespace: impl Into<String>) -> Result<Self, QueryError> {
        config.validate()?;
        let retriever = Retriever::new(store, namespace, config.search_retry.clone());
        let answers = AnswerAssembler::new(config.system_prompt.clone(), config.generation_retry.clone());
        Ok(Self {
            config,
            filters: FilterExtractor::new(),
            retriever,
            answers,
            llm,
        })
    }

    /// Set the sampling temperature (`[0, 2]`) and completion length (`> 0`)
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Result<Self, QueryError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::out_of_range("temperature", format!("must be within [0, 2], got {}", temperature)).into());
        }
        if max_tokens == 0 {
            return Err(ConfigError::out_of_range("max_tokens", "must be greater than 0").into());
        }
        self.answers = self.answers.with_sampling(temperature, max_tokens);
        Ok(self)
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Name of the LLM provider
    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    /// Answer `question` with inferred filters and the configured `top_k`
    pub async fn query(&self, question: &str) -> Result<QueryResponse, QueryError> {
        self.query_with_options(question, QueryOptions::default()).await
    }

    /// Answer `question` with explicit options
    pub async fn query_with_options(&self, question: &str, options: QueryOptions) -> Result<QueryResponse, QueryError> {
        let source = if options.apply_filters {
            FilterSource::Inferred
        } else {
            FilterSource::Disabled
        };
        self.run(QueryId::new(), question, source, options.top_k).await
    }

    /// Answer `question` restricted by a caller-supplied filter
    ///
    /// No filter is inferred from the question. When nothing matches, the
    /// answer names the filter.
    pub async fn query_with_filter(
        &self,
        question: &str,
        filter: Filter,
        top_k: Option<usize>,
    ) -> Result<QueryResponse, QueryError> {
        self.run(QueryId::new(), question, FilterSource::Explicit(filter), top_k)
            .await
    }

    /// Answer `question` unless `cancel` fires first
    ///
    /// Cancellation drops the pending search or generation call and returns
    /// [`QueryError::Cancelled`]; nothing computed so far is returned.
    pub async fn query_with_cancellation(
        &self,
        question: &str,
        options: QueryOptions,
        cancel: CancellationToken,
    ) -> Result<QueryResponse, QueryError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Query cancelled");
                Err(QueryError::Cancelled)
            }
            result = self.query_with_options(question, options) => result,
        }
    }

    async fn run(
        &self,
        query_id: QueryId,
        question: &str,
        source: FilterSource,
        top_k: Option<usize>,
    ) -> Result<QueryResponse, QueryError> {
        let span = tracing::info_span!("query", query_id = %query_id);
        self.execute(query_id, question, source, top_k).instrument(span).await
    }

    async fn execute(
        &self,
        query_id: QueryId,
        question: &str,
        source: FilterSource,
        top_k: Option<usize>,
    ) -> Result<QueryResponse, QueryError> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        validate_top_k(top_k)?;
        tracing::info!(stage = %QueryStage::Received, top_k, "Query received");

        let (filter, explicit) = match source {
            FilterSource::Inferred => (self.filters.extract(question), false),
            FilterSource::Disabled => (Filter::new(), false),
            FilterSource::Explicit(filter) => (filter, true),
        };
        tracing::debug!(stage = %QueryStage::FiltersExtracted, filter = %filter, explicit);

        let matches = self.retriever.search(question, top_k, &filter).await;
        tracing::debug!(stage = %QueryStage::Retrieved, matches = matches.len());

        if matches.is_empty() {
            let answer = if explicit && !filter.is_empty() {
                format!("No clubs found matching your criteria: {}", filter)
            } else {
                NO_MATCH_ANSWER.to_string()
            };
            tracing::info!(stage = %QueryStage::Completed, "No matches, skipping generation");
            return Ok(QueryResponse {
                query_id,
                answer,
                citations: Vec::new(),
                retrieved_chunks: Vec::new(),
                filters_applied: filter,
            });
        }

        let (context, citations) = ContextBuilder::build(&matches);
        tracing::debug!(stage = %QueryStage::ContextBuilt, sources = citations.len());

        let answer = self.answers.answer(&self.llm, question, &context).await?;
        tracing::debug!(stage = %QueryStage::Generated, provider = self.llm.name(), chars = answer.len());

        tracing::info!(stage = %QueryStage::Completed, sources = citations.len(), "Query answered");
        Ok(QueryResponse {
            query_id,
            answer,
            citations,
            retrieved_chunks: matches,
            filters_applied: filter,
        })
    }
}
