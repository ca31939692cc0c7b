#[cfg(test)]
mod tests {
    use crate::{QueryError, QueryOptions, RagConfig, RagEngine, NO_MATCH_ANSWER};
    use async_trait::async_trait;
    use clubhouse_domain::{
        Chunk, ChunkMetadata, Filter, FilterOp, FilterValue, Metadata, Predicate, RetryPolicy, RetryableError,
        SearchMatch, VectorStore,
    };
    use clubhouse_llm::{LlmError, MockProvider};
    use clubhouse_store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn club_chunk(club: &str, dues: Option<f64>, text: &str) -> Chunk {
        Chunk {
            id: format!("{}_0", club.replace(' ', "_")),
            text: text.to_string(),
            metadata: ChunkMetadata {
                document: Metadata {
                    club_name: Some(club.to_string()),
                    dues,
                    ..Metadata::for_source(format!("{}.pdf", club.to_lowercase().replace(' ', "_")))
                },
                chunk_index: 0,
                total_chunks: 1,
            },
        }
    }

    fn fast_config() -> RagConfig {
        let policy = RetryPolicy {
            timeout_ms: 2_000,
            max_retries: 1,
            initial_backoff_ms: 1,
        };
        RagConfig {
            search_retry: policy.clone(),
            generation_retry: policy,
            ..Default::default()
        }
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert(
                "clubs",
                &[
                    club_chunk("Chess Club", Some(10.0), "The Chess Club welcomes all clubs members. Dues are $10."),
                    club_chunk("Sailing Club", Some(20.0), "The Sailing Club has clubs events. Dues are $20."),
                    club_chunk("Book Club", None, "The Book Club reads monthly."),
                ],
            )
            .await
            .unwrap();
        store
    }

    fn engine(store: Arc<MemoryStore>, llm: MockProvider) -> RagEngine<Arc<MemoryStore>, MockProvider> {
        RagEngine::new(fast_config(), store, llm, "clubs").unwrap()
    }

    #[tokio::test]
    async fn test_query_answers_with_citations() {
        let llm = MockProvider::new("The Chess Club charges $10 [Source 1].");
        let engine = engine(seeded_store().await, llm.clone());

        let response = engine.query("What are the chess club dues?").await.unwrap();

        assert_eq!(response.answer, "The Chess Club charges $10 [Source 1].");
        assert!(response.filters_applied.is_empty());
        assert_eq!(response.retrieved_chunks.len(), response.citations.len());
        assert_eq!(response.retrieved_chunks[0].metadata.document.club_name.as_deref(), Some("Chess Club"));
        assert_eq!(response.citations[0].club_name, "Chess Club");
        assert_eq!(response.citations[0].source_number, 1);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user_prompt.contains("[Source 1] Chess Club:"));
        assert!(requests[0].user_prompt.contains("Question: What are the chess club dues?"));
        assert_eq!(requests[0].temperature, 0.3);
        assert_eq!(requests[0].max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_inferred_dues_filter_restricts_matches() {
        let engine = engine(seeded_store().await, MockProvider::new("Chess Club [Source 1]"));

        let response = engine.query("clubs under $15").await.unwrap();

        let expected = Filter::new().with(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(15.0)));
        assert_eq!(response.filters_applied, expected);
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].club_name, "Chess Club");
    }

    #[tokio::test]
    async fn test_filters_can_be_disabled() {
        let engine = engine(seeded_store().await, MockProvider::new("answer"));
        let options = QueryOptions {
            top_k: Some(2),
            apply_filters: false,
        };

        let response = engine.query_with_options("clubs under $15", options).await.unwrap();
        assert!(response.filters_applied.is_empty());
        assert_eq!(response.citations.len(), 2);
    }

    #[tokio::test]
    async fn test_no_matches_skips_generation() {
        let llm = MockProvider::new("should not be called");
        let engine = engine(seeded_store().await, llm.clone());

        let response = engine.query("robotics workshop schedule").await.unwrap();

        assert_eq!(response.answer, NO_MATCH_ANSWER);
        assert!(response.citations.is_empty());
        assert!(response.retrieved_chunks.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_filter_without_matches_names_criteria() {
        let llm = MockProvider::new("unused");
        let engine = engine(seeded_store().await, llm.clone());
        let filter = Filter::new().with(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(5.0)));

        let response = engine.query_with_filter("clubs", filter, None).await.unwrap();

        assert_eq!(response.answer, "No clubs found matching your criteria: dues lte 5");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_club_filter() {
        let engine = engine(seeded_store().await, MockProvider::new("Sailing [Source 1]"));
        let filter = Filter::new().with(Predicate::new(
            "club_name",
            FilterOp::Eq,
            FilterValue::Text("Sailing Club".to_string()),
        ));

        let response = engine.query_with_filter("clubs events dues", filter.clone(), Some(3)).await.unwrap();
        assert_eq!(response.filters_applied, filter);
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].source_file.as_deref(), Some("sailing_club.pdf"));
    }

    #[tokio::test]
    async fn test_generation_failure_is_an_error() {
        let llm = MockProvider::new("unused");
        llm.fail_next(LlmError::Unauthorized("invalid key".to_string()));
        let engine = engine(seeded_store().await, llm);

        let result = engine.query("chess club").await;
        assert!(matches!(result, Err(QueryError::Generation(_))));
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let engine = engine(seeded_store().await, MockProvider::new("x"));
        let options = QueryOptions {
            top_k: Some(0),
            ..Default::default()
        };
        let result = engine.query_with_options("chess", options).await;
        assert!(matches!(result, Err(QueryError::Config(_))));
    }

    #[tokio::test]
    async fn test_sampling_validation() {
        let store = seeded_store().await;
        let result = RagEngine::new(fast_config(), Arc::clone(&store), MockProvider::default(), "clubs")
            .unwrap()
            .with_sampling(2.5, 100);
        assert!(matches!(result, Err(QueryError::Config(_))));

        let llm = MockProvider::new("ok");
        let engine = RagEngine::new(fast_config(), store, llm.clone(), "clubs")
            .unwrap()
            .with_sampling(0.0, 64)
            .unwrap();
        engine.query("chess club").await.unwrap();
        assert_eq!(llm.requests()[0].max_tokens, 64);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_pending_generation() {
        let llm = MockProvider::new("too late").with_delay(Duration::from_secs(10));
        let engine = engine(seeded_store().await, llm);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = engine
            .query_with_cancellation("chess club", QueryOptions::default(), token)
            .await;
        assert_eq!(result, Err(QueryError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_token() {
        let llm = MockProvider::new("unused");
        let engine = engine(seeded_store().await, llm.clone());
        let token = CancellationToken::new();
        token.cancel();

        let result = engine
            .query_with_cancellation("chess club", QueryOptions::default(), token)
            .await;
        assert_eq!(result, Err(QueryError::Cancelled));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_uncancelled_query_completes() {
        let engine = engine(seeded_store().await, MockProvider::new("done"));
        let result = engine
            .query_with_cancellation("chess club", QueryOptions::default(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.answer, "done");
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_engine() {
        let llm = MockProvider::new("answer");
        let engine = Arc::new(engine(seeded_store().await, llm.clone()));

        let (a, b) = tokio::join!(engine.query("chess club"), engine.query("sailing club"));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.query_id, b.query_id);
        assert_eq!(llm.call_count(), 2);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("index unavailable")]
    struct Unavailable;

    impl RetryableError for Unavailable {
        fn is_transient(&self) -> bool {
            true
        }
    }

    struct DownStore;

    #[async_trait]
    impl VectorStore for DownStore {
        type Error = Unavailable;

        async fn upsert(&self, _namespace: &str, _chunks: &[Chunk]) -> Result<usize, Self::Error> {
            Err(Unavailable)
        }

        async fn search(
            &self,
            _namespace: &str,
            _query: &str,
            _top_k: usize,
            _filter: &Filter,
        ) -> Result<Vec<SearchMatch>, Self::Error> {
            Err(Unavailable)
        }

        async fn delete_namespace(&self, _namespace: &str) -> Result<(), Self::Error> {
            Err(Unavailable)
        }
    }

    #[tokio::test]
    async fn test_search_outage_degrades_to_no_match_answer() {
        let llm = MockProvider::new("unused");
        let engine = RagEngine::new(fast_config(), DownStore, llm.clone(), "clubs").unwrap();

        let response = engine.query("chess club").await.unwrap();
        assert_eq!(response.answer, NO_MATCH_ANSWER);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_response_serializes() {
        let engine = engine(seeded_store().await, MockProvider::new("Chess [Source 1]"));
        let response = engine.query("clubs under $15").await.unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["answer"], "Chess [Source 1]");
        assert_eq!(json["filters_applied"][0]["field"], "dues");
        assert_eq!(json["filters_applied"][0]["operator"], "lte");
        assert_eq!(json["citations"][0]["source_number"], 1);
    }
}
