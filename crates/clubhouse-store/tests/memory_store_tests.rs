//! Integration tests for the configured in-memory backend
//!
//! These tests drive the store only through the `VectorStore` trait, the way
//! the indexer and the query engine use it.

use clubhouse_domain::{Chunk, ChunkMetadata, Filter, FilterOp, FilterValue, Metadata, Predicate, VectorStore};
use clubhouse_store::{ConfiguredStore, StoreBackend, StoreSettings};

fn club_chunks(club: &str, dues: Option<f64>, texts: &[&str]) -> Vec<Chunk> {
    let document = Metadata {
        club_name: Some(club.to_string()),
        dues,
        ..Metadata::for_source(format!("{}.pdf", club.to_lowercase().replace(' ', "_")))
    };
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            id: format!("{}_{}", club.replace(' ', "_"), i),
            text: text.to_string(),
            metadata: ChunkMetadata {
                document: document.clone(),
                chunk_index: i,
                total_chunks: texts.len(),
            },
        })
        .collect()
}

fn memory_store() -> ConfiguredStore {
    ConfiguredStore::from_settings(&StoreSettings {
        backend: StoreBackend::Memory,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_upsert_then_search_by_club() {
    let store = memory_store();
    let mut chunks = club_chunks("Chess Club", Some(10.0), &["The Chess Club meets every Tuesday.", "Dues are $10 per semester."]);
    chunks.extend(club_chunks("Robotics Society", Some(40.0), &["Robotics Society builds robots weekly."]));

    assert_eq!(store.upsert("clubs", &chunks).await.unwrap(), 3);

    let matches = store.search("clubs", "when does chess meet", 5, &Filter::new()).await.unwrap();
    assert!(!matches.is_empty());
    assert_eq!(matches[0].id, "Chess_Club_0");
    assert_eq!(matches[0].metadata.document.club_name.as_deref(), Some("Chess Club"));
    assert!(matches.iter().all(|m| (0.0..=1.0).contains(&m.score)));
}

#[tokio::test]
async fn test_dues_filter_excludes_expensive_and_unknown() {
    let store = memory_store();
    let mut chunks = club_chunks("Chess Club", Some(10.0), &["club meets weekly"]);
    chunks.extend(club_chunks("Sailing Club", Some(150.0), &["club meets weekly"]));
    chunks.extend(club_chunks("Book Club", None, &["club meets weekly"]));
    store.upsert("clubs", &chunks).await.unwrap();

    let filter = Filter::new().with(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(20.0)));
    let matches = store.search("clubs", "club meets", 10, &filter).await.unwrap();

    let clubs: Vec<_> = matches
        .iter()
        .filter_map(|m| m.metadata.document.club_name.as_deref())
        .collect();
    assert_eq!(clubs, vec!["Chess Club"]);
}

#[tokio::test]
async fn test_club_name_filter() {
    let store = memory_store();
    let mut chunks = club_chunks("Chess Club", Some(10.0), &["weekly meetings"]);
    chunks.extend(club_chunks("Go Club", Some(5.0), &["weekly meetings"]));
    store.upsert("clubs", &chunks).await.unwrap();

    let filter = Filter::new().with(Predicate::new(
        "club_name",
        FilterOp::Eq,
        FilterValue::Text("Go Club".to_string()),
    ));
    let matches = store.search("clubs", "weekly meetings", 10, &filter).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "Go_Club_0");
}

#[tokio::test]
async fn test_delete_namespace_clears_results() {
    let store = memory_store();
    store
        .upsert("clubs", &club_chunks("Chess Club", None, &["chess"]))
        .await
        .unwrap();
    store.delete_namespace("clubs").await.unwrap();

    assert!(store.search("clubs", "chess", 5, &Filter::new()).await.unwrap().is_empty());
    // deleting again is fine
    store.delete_namespace("clubs").await.unwrap();
}

#[tokio::test]
async fn test_clones_share_memory_backend() {
    let store = memory_store();
    let handle = store.clone();
    store
        .upsert("clubs", &club_chunks("Chess Club", None, &["chess"]))
        .await
        .unwrap();

    let ConfiguredStore::Memory(memory) = handle else {
        panic!("expected memory backend");
    };
    assert_eq!(memory.len("clubs"), 1);
}
