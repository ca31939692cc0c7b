//! Core Indexer implementation

use crate::discovery::discover;
use crate::{IndexerConfig, IndexerError, IngestionSummary};
use clubhouse_domain::{Chunk, DocumentFormat, RawDocument, VectorStore};
use clubhouse_extractor::{ChunkingConfig, DocumentProcessor, ProcessedDocument};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one document, tagged with its discovery position
type Processed = (usize, String, Result<ProcessedDocument, String>);

/// Turns documents into chunks and writes them to a vector store
///
/// Documents are processed concurrently by at most `workers` tasks, each
/// running extraction and chunking on the blocking pool. Results are put back
/// in input order before upserting, so the same input always produces the
/// same chunk sequence. Upserts go out in batches of `batch_size`, one at a
/// time, each under the configured retry policy.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::RawDocument;
/// use clubhouse_extractor::ChunkingConfig;
/// use clubhouse_indexer::{Indexer, IndexerConfig};
/// use clubhouse_store::MemoryStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let indexer = Indexer::new(
///     IndexerConfig::default(),
///     &ChunkingConfig::default(),
///     Arc::clone(&store),
///     "clubs",
/// )?;
///
/// let docs = vec![RawDocument::text("chess.txt", "The Chess Club meets weekly. Dues are $5.")];
/// let summary = indexer.ingest_documents(docs).await;
/// assert!(summary.is_success());
/// assert_eq!(store.len("clubs"), summary.chunks_upserted);
/// # Ok(())
/// # }
/// ```
pub struct Indexer<S: VectorStore> {
    config: IndexerConfig,
    processor: Arc<DocumentProcessor>,
    store: S,
    namespace: String,
}

impl<S: VectorStore> Indexer<S> {
    /// Create an indexer writing into `namespace` of `store`
    pub fn new(
        config: IndexerConfig,
        chunking: &ChunkingConfig,
        store: S,
        namespace: impl Into<String>,
    ) -> Result<Self, IndexerError> {
        config.validate()?;
        let processor = DocumentProcessor::from_config(chunking)?;
        Ok(Self {
            config,
            processor: Arc::new(processor),
            store,
            namespace: namespace.into(),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Namespace chunks are written to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Remove everything previously ingested into the namespace
    pub async fn clear(&self) -> Result<(), IndexerError> {
        self.config
            .retry
            .run("delete_namespace", || self.store.delete_namespace(&self.namespace))
            .await
            .map_err(|e| IndexerError::Store(e.to_string()))?;
        tracing::info!(namespace = %self.namespace, "Cleared namespace");
        Ok(())
    }

    /// Ingest the configured input directory
    pub async fn ingest(&self) -> Result<IngestionSummary, IndexerError> {
        let dir = self.config.input_dir.clone();
        self.ingest_directory(&dir).await
    }

    /// Ingest every supported file under `dir`
    ///
    /// Fails only if `dir` cannot be read. Unsupported files are skipped with
    /// a warning; unreadable or unprocessable files are recorded as failures.
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestionSummary, IndexerError> {
        let start = Instant::now();
        let discovery = discover(dir)?;
        let mut summary = IngestionSummary::new();
        for path in &discovery.skipped {
            summary.record_skipped(path.display().to_string());
        }

        let documents = discovery
            .documents
            .into_iter()
            .map(|(path, format)| Pending::OnDisk { path, format })
            .collect();

        self.run(documents, &mut summary).await;
        summary.elapsed = start.elapsed();
        tracing::info!(
            documents = summary.documents_processed,
            failed = summary.documents_failed(),
            chunks = summary.chunks_upserted,
            "Ingestion complete"
        );
        Ok(summary)
    }

    /// Ingest documents already in memory
    pub async fn ingest_documents(&self, documents: Vec<RawDocument>) -> IngestionSummary {
        let start = Instant::now();
        let mut summary = IngestionSummary::new();
        let documents = documents.into_iter().map(Pending::Loaded).collect();
        self.run(documents, &mut summary).await;
        summary.elapsed = start.elapsed();
        summary
    }

    async fn run(&self, documents: Vec<Pending>, summary: &mut IngestionSummary) {
        let chunks = self.process_all(documents, summary).await;
        self.upsert_batches(&chunks, summary).await;
    }

    async fn process_all(&self, documents: Vec<Pending>, summary: &mut IngestionSummary) -> Vec<Chunk> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();

        for (index, pending) in documents.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let processor = Arc::clone(&self.processor);
            tasks.spawn(async move {
                // Held until the document is processed
                let _permit = semaphore.acquire_owned().await;
                let source = pending.source();
                let document = match pending.load(source.clone()).await {
                    Ok(document) => document,
                    Err(reason) => return (index, source, Err(reason)),
                };
                let result = tokio::task::spawn_blocking(move || processor.process(&document))
                    .await
                    .map_err(|e| format!("worker failed: {}", e))
                    .and_then(|r| r.map_err(|e| e.to_string()));
                (index, source, result)
            });
        }

        let mut results: Vec<Processed> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => results.push(outcome),
                Err(e) => {
                    tracing::error!(error = %e, "Ingestion task failed");
                    summary.record_document_failure("<unknown>", e.to_string());
                }
            }
        }
        results.sort_by_key(|(index, _, _)| *index);

        let mut chunks = Vec::new();
        for (_, source, result) in results {
            match result {
                Ok(processed) => {
                    summary.record_processed(processed.chunks.len());
                    chunks.extend(processed.chunks);
                }
                Err(reason) => {
                    tracing::warn!(source = %source, error = %reason, "Skipping document");
                    summary.record_document_failure(source, reason);
                }
            }
        }
        chunks
    }

    async fn upsert_batches(&self, chunks: &[Chunk], summary: &mut IngestionSummary) {
        for (batch, slice) in chunks.chunks(self.config.batch_size).enumerate() {
            let result = self
                .config
                .retry
                .run("upsert", || self.store.upsert(&self.namespace, slice))
                .await;

            match result {
                Ok(written) => {
                    summary.chunks_upserted += written;
                    tracing::info!(batch, chunks = written, namespace = %self.namespace, "Upserted batch");
                }
                Err(e) => {
                    tracing::error!(batch, chunks = slice.len(), error = %e, "Batch upsert failed");
                    summary.record_batch_failure(batch, slice.len(), e.to_string());
                }
            }
        }
    }
}

/// A document waiting for a worker
///
/// Files found on disk are only read once a worker permit is held.
pub(crate) enum Pending {
    Loaded(RawDocument),
    OnDisk { path: PathBuf, format: DocumentFormat },
}

impl Pending {
    /// Source name recorded in chunk metadata and failures
    pub(crate) fn source(&self) -> String {
        match self {
            Pending::Loaded(document) => document.source.clone(),
            Pending::OnDisk { path, .. } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub(crate) async fn load(self, source: String) -> Result<RawDocument, String> {
        match self {
            Pending::Loaded(document) => Ok(document),
            Pending::OnDisk { path, format } => match tokio::fs::read(&path).await {
                Ok(content) => Ok(RawDocument::new(source, content, format)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read document");
                    Err(e.to_string())
                }
            },
        }
    }
}
