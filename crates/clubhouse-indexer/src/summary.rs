//! Outcome of an ingestion run

use serde::Serialize;
use std::time::Duration;

/// A document that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// Source file name
    pub source: String,
    /// Why it failed
    pub reason: String,
}

/// A batch the store rejected after retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// 0-based batch number
    pub batch: usize,
    /// Chunks in the batch
    pub chunks: usize,
    /// Final error
    pub reason: String,
}

/// Counters and failures collected during one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    /// Documents turned into chunks
    pub documents_processed: usize,

    /// Documents skipped because processing failed
    pub failed_documents: Vec<DocumentFailure>,

    /// Files ignored because their format is unsupported
    pub skipped_files: Vec<String>,

    /// Chunks produced by processing
    pub chunks_created: usize,

    /// Chunks the store acknowledged
    pub chunks_upserted: usize,

    /// Batches that failed after retries
    pub failed_batches: Vec<BatchFailure>,

    /// Wall-clock time of the run
    #[serde(skip)]
    pub elapsed: Duration,
}

impl IngestionSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_processed(&mut self, chunks: usize) {
        self.documents_processed += 1;
        self.chunks_created += chunks;
    }

    pub(crate) fn record_document_failure(&mut self, source: impl Into<String>, reason: impl Into<String>) {
        self.failed_documents.push(DocumentFailure {
            source: source.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn record_skipped(&mut self, path: impl Into<String>) {
        self.skipped_files.push(path.into());
    }

    pub(crate) fn record_batch_failure(&mut self, batch: usize, chunks: usize, reason: impl Into<String>) {
        self.failed_batches.push(BatchFailure {
            batch,
            chunks,
            reason: reason.into(),
        });
    }

    /// Number of documents that failed
    pub fn documents_failed(&self) -> usize {
        self.failed_documents.len()
    }

    /// True when every document was processed and every batch stored
    pub fn is_success(&self) -> bool {
        self.failed_documents.is_empty() && self.failed_batches.is_empty()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Ingestion Summary".to_string(),
            "=================".to_string(),
            format!("Documents processed: {}", self.documents_processed),
            format!("Documents failed: {}", self.documents_failed()),
            format!("Chunks created: {}", self.chunks_created),
            format!("Chunks upserted: {}", self.chunks_upserted),
            format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()),
        ];

        if !self.skipped_files.is_empty() {
            lines.push(String::new());
            lines.push(format!("Skipped (unsupported format): {}", self.skipped_files.len()));
            for path in &self.skipped_files {
                lines.push(format!("  {}", path));
            }
        }

        if !self.failed_documents.is_empty() {
            lines.push(String::new());
            lines.push("Failed documents:".to_string());
            for failure in &self.failed_documents {
                lines.push(format!("  {}: {}", failure.source, failure.reason));
            }
        }

        if !self.failed_batches.is_empty() {
            lines.push(String::new());
            lines.push("Failed batches:".to_string());
            for failure in &self.failed_batches {
                lines.push(format!(
                    "  batch {} ({} chunks): {}",
                    failure.batch, failure.chunks, failure.reason
                ));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_is_success() {
        let summary = IngestionSummary::new();
        assert!(summary.is_success());
        assert_eq!(summary.documents_failed(), 0);
    }

    #[test]
    fn test_record_counts() {
        let mut summary = IngestionSummary::new();
        summary.record_processed(3);
        summary.record_processed(2);
        summary.record_document_failure("broken.pdf", "PDF error");

        assert_eq!(summary.documents_processed, 2);
        assert_eq!(summary.chunks_created, 5);
        assert_eq!(summary.documents_failed(), 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_batch_failure_is_not_success() {
        let mut summary = IngestionSummary::new();
        summary.record_batch_failure(1, 100, "HTTP 500");
        assert!(!summary.is_success());
    }

    #[test]
    fn test_skipped_files_do_not_fail_run() {
        let mut summary = IngestionSummary::new();
        summary.record_skipped("budget.xlsx");
        assert!(summary.is_success());
    }

    #[test]
    fn test_summary() {
        let mut summary = IngestionSummary::new();
        summary.record_processed(4);
        summary.chunks_upserted = 4;
        summary.record_skipped("notes.docx");
        summary.record_document_failure("empty.txt", "no text");
        summary.record_batch_failure(0, 4, "timed out");

        let report = summary.summary();
        assert!(report.contains("Documents processed: 1"));
        assert!(report.contains("Chunks upserted: 4"));
        assert!(report.contains("notes.docx"));
        assert!(report.contains("empty.txt: no text"));
        assert!(report.contains("batch 0 (4 chunks): timed out"));
    }
}
