//! In-process vector store with lexical scoring

use crate::StoreError;
use async_trait::async_trait;
use clubhouse_domain::{Chunk, Filter, SearchMatch, VectorStore};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

/// In-memory store: namespace → chunks keyed by id
///
/// Search applies the filter locally and ranks chunks by the fraction of
/// distinct query terms that appear in the chunk text. Ties are broken by id
/// so results are deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, BTreeMap<String, Chunk>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks in a namespace
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// True when the namespace holds no chunks
    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }

    /// Fetch a chunk by id
    pub fn get(&self, namespace: &str, id: &str) -> Option<Chunk> {
        self.namespaces.read().ok()?.get(namespace)?.get(id).cloned()
    }
}

fn poisoned() -> StoreError {
    StoreError::Communication("memory store lock poisoned".to_string())
}

/// Lowercased alphanumeric terms
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query terms present in `text`, in `[0, 1]`
fn lexical_score(query_terms: &HashSet<String>, text: &str) -> f64 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let text_terms = terms(text);
    let hits = query_terms.iter().filter(|t| text_terms.contains(*t)).count();
    hits as f64 / query_terms.len() as f64
}

#[async_trait]
impl VectorStore for MemoryStore {
    type Error = StoreError;

    async fn upsert(&self, namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error> {
        let mut namespaces = self.namespaces.write().map_err(|_| poisoned())?;
        let entries = namespaces.entry(namespace.to_string()).or_default();
        for chunk in chunks {
            entries.insert(chunk.id.clone(), chunk.clone());
        }
        tracing::debug!(namespace, count = chunks.len(), "Upserted chunks into memory store");
        Ok(chunks.len())
    }

    async fn search(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
        filter: &Filter,
    ) -> Result<Vec<SearchMatch>, Self::Error> {
        let namespaces = self.namespaces.read().map_err(|_| poisoned())?;
        let Some(entries) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let query_terms = terms(query);
        let mut matches: Vec<SearchMatch> = entries
            .values()
            .filter(|chunk| filter.matches(&chunk.metadata))
            .map(|chunk| SearchMatch {
                id: chunk.id.clone(),
                score: lexical_score(&query_terms, &chunk.text),
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
            })
            .filter(|m| m.score > 0.0)
            .collect();

        // BTreeMap iteration is id-ordered, so a stable sort keeps ties by id
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), Self::Error> {
        let mut namespaces = self.namespaces.write().map_err(|_| poisoned())?;
        namespaces.remove(namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_domain::{ChunkMetadata, FilterOp, FilterValue, Metadata, Predicate};

    fn chunk(id: &str, text: &str, dues: Option<f64>) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: text.to_string(),
            metadata: ChunkMetadata {
                document: Metadata {
                    dues,
                    ..Metadata::for_source(format!("{}.txt", id))
                },
                chunk_index: 0,
                total_chunks: 1,
            },
        }
    }

    #[test]
    fn test_lexical_score() {
        let q = terms("chess club dues");
        assert_eq!(lexical_score(&q, "The Chess Club charges dues."), 1.0);
        assert!((lexical_score(&q, "chess only") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(lexical_score(&HashSet::new(), "anything"), 0.0);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let store = MemoryStore::new();
        store.upsert("ns", &[chunk("a", "old text", None)]).await.unwrap();
        store.upsert("ns", &[chunk("a", "new text", None)]).await.unwrap();

        assert_eq!(store.len("ns"), 1);
        assert_eq!(store.get("ns", "a").map(|c| c.text), Some("new text".to_string()));
    }

    #[tokio::test]
    async fn test_search_ranks_and_truncates() {
        let store = MemoryStore::new();
        store
            .upsert(
                "ns",
                &[
                    chunk("a", "chess club meets weekly", None),
                    chunk("b", "the chess players", None),
                    chunk("c", "robotics lab", None),
                ],
            )
            .await
            .unwrap();

        let matches = store.search("ns", "chess club", 5, &Filter::new()).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(matches[0].score, 1.0);

        let top1 = store.search("ns", "chess club", 1, &Filter::new()).await.unwrap();
        assert_eq!(top1.len(), 1);
    }

    #[tokio::test]
    async fn test_search_applies_filter() {
        let store = MemoryStore::new();
        store
            .upsert(
                "ns",
                &[
                    chunk("cheap", "club dues info", Some(10.0)),
                    chunk("pricey", "club dues info", Some(20.0)),
                    chunk("unknown", "club dues info", None),
                ],
            )
            .await
            .unwrap();

        let filter = Filter::new().with(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(15.0)));
        let matches = store.search("ns", "club dues", 5, &filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "cheap");
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.upsert("one", &[chunk("a", "chess", None)]).await.unwrap();

        assert!(store.search("two", "chess", 5, &Filter::new()).await.unwrap().is_empty());

        store.delete_namespace("one").await.unwrap();
        assert!(store.is_empty("one"));
    }
}
