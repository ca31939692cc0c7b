//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::commands::setup::build_indexer;
use crate::config::Settings;
use crate::error::Result;
use crate::output::Formatter;
use clubhouse_indexer::IngestionSummary;
use clubhouse_store::ConfiguredStore;

/// Execute the ingest command.
///
/// Partial failures are reported but do not fail the command.
pub async fn execute_ingest(args: IngestArgs, settings: &Settings, formatter: &Formatter) -> Result<IngestionSummary> {
    let mut settings = settings.clone();
    if let Some(dir) = args.input_dir {
        settings.indexer.input_dir = dir;
    }
    settings.validate()?;

    let store = ConfiguredStore::from_settings(&settings.store)?;
    if store.is_ephemeral() {
        eprintln!(
            "{}",
            formatter.warning("The in-memory store is discarded on exit; configure Pinecone to persist the index")
        );
    }

    let indexer = build_indexer(&settings, store)?;
    if args.clear {
        indexer.clear().await?;
        eprintln!(
            "{}",
            formatter.info(&format!("Cleared namespace '{}'", indexer.namespace()))
        );
    }

    let summary = indexer.ingest().await?;
    println!("{}", formatter.format_summary(&summary)?);

    if !summary.is_success() {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} document(s) failed, {} batch(es) rejected",
                summary.documents_failed(),
                summary.failed_batches.len()
            ))
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clubhouse_indexer::IndexerError;
    use clubhouse_store::StoreBackend;
    use crate::error::CliError;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.store.backend = StoreBackend::Memory;
        settings
    }

    #[tokio::test]
    async fn test_ingest_overrides_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sailing.md"), "# Sailing Club\n\nWe sail on weekends. Dues: $25").unwrap();
        std::fs::write(dir.path().join("notes.csv"), "a,b").unwrap();

        let args = IngestArgs {
            input_dir: Some(dir.path().to_path_buf()),
            clear: true,
        };
        let summary = execute_ingest(args, &settings(), &Formatter::new(OutputFormat::Quiet, false))
            .await
            .unwrap();

        assert_eq!(summary.documents_processed, 1);
        assert_eq!(summary.skipped_files.len(), 1);
        assert!(summary.chunks_upserted >= 1);
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_missing_input_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = IngestArgs {
            input_dir: Some(dir.path().join("absent")),
            clear: false,
        };
        let result = execute_ingest(args, &settings(), &Formatter::new(OutputFormat::Quiet, false)).await;
        assert!(matches!(result, Err(CliError::Indexer(IndexerError::Io { .. }))));
    }
}
