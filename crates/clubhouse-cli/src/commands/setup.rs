//! Wiring shared by the commands that touch the store.

use crate::config::Settings;
use crate::error::Result;
use crate::output::Formatter;
use clubhouse_domain::LlmProvider;
use clubhouse_indexer::Indexer;
use clubhouse_llm::{build_provider, LlmError};
use clubhouse_rag::RagEngine;
use clubhouse_store::ConfiguredStore;

/// Query engine over the configured store and provider.
pub type Engine = RagEngine<ConfiguredStore, Box<dyn LlmProvider<Error = LlmError>>>;

/// Build an indexer writing to `store`.
pub fn build_indexer(settings: &Settings, store: ConfiguredStore) -> Result<Indexer<ConfiguredStore>> {
    let indexer = Indexer::new(
        settings.indexer.clone(),
        &settings.chunking,
        store,
        settings.store.namespace.clone(),
    )?;
    Ok(indexer)
}

/// Build the query engine.
///
/// The in-memory backend starts empty, so the configured input directory is
/// ingested first.
pub async fn build_engine(settings: &Settings, formatter: &Formatter) -> Result<Engine> {
    settings.validate()?;
    let store = ConfiguredStore::from_settings(&settings.store)?;

    if store.is_ephemeral() {
        eprintln!(
            "{}",
            formatter.info(&format!(
                "Using the in-memory store; indexing {}",
                settings.indexer.input_dir.display()
            ))
        );
        let summary = build_indexer(settings, store.clone())?.ingest().await?;
        if !summary.is_success() {
            eprintln!(
                "{}",
                formatter.warning(&format!(
                    "{} document(s) and {} batch(es) failed to index",
                    summary.documents_failed(),
                    summary.failed_batches.len()
                ))
            );
        }
    }

    let llm = build_provider(&settings.llm)?;
    tracing::debug!(
        store = store.backend_name(),
        provider = llm.name(),
        namespace = %settings.store.namespace,
        "Engine ready"
    );

    let engine = RagEngine::new(settings.rag.clone(), store, llm, settings.store.namespace.clone())?
        .with_sampling(settings.llm.temperature, settings.llm.max_tokens)?;
    Ok(engine)
}
