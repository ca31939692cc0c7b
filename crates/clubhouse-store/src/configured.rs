use crate::{MemoryStore, PineconeStore, StoreBackend, StoreError, StoreSettings};
use async_trait::async_trait;
use clubhouse_domain::{Chunk, Filter, SearchMatch, VectorStore};
use std::sync::Arc;

/// The store selected by [`StoreSettings`]
///
/// The memory variant is shared so the caller can keep a handle for
/// inspection after handing the store to an indexer or engine.
#[derive(Clone)]
pub enum ConfiguredStore {
    /// Hosted Pinecone index
    Pinecone(Arc<PineconeStore>),
    /// In-process store
    Memory(Arc<MemoryStore>),
}

impl ConfiguredStore {
    /// Build the backend named in `settings`
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, StoreError> {
        settings.validate()?;
        let store = match settings.backend {
            StoreBackend::Pinecone => Self::Pinecone(Arc::new(PineconeStore::new(&settings.pinecone)?)),
            StoreBackend::Memory => Self::Memory(Arc::new(MemoryStore::new())),
        };
        tracing::debug!(backend = store.backend_name(), "Vector store configured");
        Ok(store)
    }

    /// Short backend name for logs and status output
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Pinecone(_) => "pinecone",
            Self::Memory(_) => "memory",
        }
    }

    /// True when chunks do not outlive the process
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

#[async_trait]
impl VectorStore for ConfiguredStore {
    type Error = StoreError;

    async fn upsert(&self, namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error> {
        match self {
            Self::Pinecone(store) => store.upsert(namespace, chunks).await,
            Self::Memory(store) => store.upsert(namespace, chunks).await,
        }
    }

    async fn search(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
        filter: &Filter,
    ) -> Result<Vec<SearchMatch>, Self::Error> {
        match self {
            Self::Pinecone(store) => store.search(namespace, query, top_k, filter).await,
            Self::Memory(store) => store.search(namespace, query, top_k, filter).await,
        }
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), Self::Error> {
        match self {
            Self::Pinecone(store) => store.delete_namespace(namespace).await,
            Self::Memory(store) => store.delete_namespace(namespace).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_from_settings() {
        let settings = StoreSettings {
            backend: StoreBackend::Memory,
            ..Default::default()
        };
        let store = ConfiguredStore::from_settings(&settings).unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.is_ephemeral());
    }

    #[test]
    fn test_pinecone_without_credentials_fails() {
        assert!(matches!(
            ConfiguredStore::from_settings(&StoreSettings::default()),
            Err(StoreError::Config(_))
        ));
    }
}
