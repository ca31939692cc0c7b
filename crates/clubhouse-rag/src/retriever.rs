//! Vector search with bounded retry

use clubhouse_domain::{Filter, RetryPolicy, SearchMatch, VectorStore};

/// Searches one namespace of a vector store
///
/// A failed search never fails the query: once the retry policy is exhausted,
/// or on a permanent error, the retriever logs a warning and returns no
/// matches.
pub struct Retriever<S: VectorStore> {
    store: S,
    namespace: String,
    policy: RetryPolicy,
}

impl<S: VectorStore> Retriever<S> {
    /// Create a retriever over `namespace`
    pub fn new(store: S, namespace: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            policy,
        }
    }

    /// Namespace searched
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Up to `top_k` matches for `query` under `filter`, best first
    pub async fn search(&self, query: &str, top_k: usize, filter: &Filter) -> Vec<SearchMatch> {
        let result = self
            .policy
            .run("search", || self.store.search(&self.namespace, query, top_k, filter))
            .await;

        match result {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(
                    namespace = %self.namespace,
                    transient = e.is_transient(),
                    error = %e,
                    "Search failed, continuing with no matches"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clubhouse_domain::{Chunk, ChunkMetadata, Metadata, RetryableError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("search failed")]
    struct SearchError {
        transient: bool,
    }

    impl RetryableError for SearchError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    /// Fails the first `failures` searches, then returns one match
    struct FlakyStore {
        failures: usize,
        transient: bool,
        calls: AtomicUsize,
    }

    impl FlakyStore {
        fn new(failures: usize, transient: bool) -> Self {
            Self {
                failures,
                transient,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorStore for FlakyStore {
        type Error = SearchError;

        async fn upsert(&self, _namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error> {
            Ok(chunks.len())
        }

        async fn search(
            &self,
            _namespace: &str,
            _query: &str,
            _top_k: usize,
            _filter: &Filter,
        ) -> Result<Vec<SearchMatch>, Self::Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(SearchError {
                    transient: self.transient,
                });
            }
            Ok(vec![SearchMatch {
                id: "chess_0".to_string(),
                score: 0.9,
                text: "Chess".to_string(),
                metadata: ChunkMetadata {
                    document: Metadata::for_source("chess.txt"),
                    chunk_index: 0,
                    total_chunks: 1,
                },
            }])
        }

        async fn delete_namespace(&self, _namespace: &str) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout_ms: 1_000,
            max_retries: 1,
            initial_backoff_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_transient_failure_retried_once() {
        let retriever = Retriever::new(FlakyStore::new(1, true), "clubs", policy());
        let matches = retriever.search("chess", 5, &Filter::new()).await;
        assert_eq!(matches.len(), 1);
        assert_eq!(retriever.store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_degrade_to_empty() {
        let retriever = Retriever::new(FlakyStore::new(2, true), "clubs", policy());
        assert!(retriever.search("chess", 5, &Filter::new()).await.is_empty());
        assert_eq!(retriever.store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_not_retried() {
        let retriever = Retriever::new(FlakyStore::new(1, false), "clubs", policy());
        assert!(retriever.search("chess", 5, &Filter::new()).await.is_empty());
        assert_eq!(retriever.store.calls.load(Ordering::SeqCst), 1);
    }
}
