//! Pipeline tests for the DocumentProcessor

#[cfg(test)]
mod tests {
    use crate::{ChunkingConfig, DocumentProcessor, ExtractionError, TextChunker, WordTokenizer};
    use clubhouse_domain::{DocumentFormat, RawDocument, Tokenizer};

    fn processor() -> DocumentProcessor {
        DocumentProcessor::from_config(&ChunkingConfig::default()).unwrap()
    }

    #[test]
    fn test_end_to_end_single_chunk() {
        let text = "Updated 10 October 2021. Paying a yearly fee of $10 per school year. \
                    The organization shall host meetings at least once every 2 months.";
        let processed = processor().process(&RawDocument::text("club.txt", text)).unwrap();

        assert_eq!(processed.chunks.len(), 1);
        let meta = &processed.metadata;
        assert_eq!(meta.dues, Some(10.0));
        assert_eq!(meta.last_updated.as_deref(), Some("10 October 2021"));
        assert_eq!(meta.meeting_frequency.as_deref(), Some("every 2 months"));
        assert_eq!(processed.chunks[0].metadata.document, *meta);
    }

    #[test]
    fn test_footer_date_fallback() {
        let text = "The Go Club plays weekly.\n14 Updated 3 March 2022\nPage 1 of 2\nAll are welcome.";
        let processed = processor().process(&RawDocument::text("go.txt", text)).unwrap();

        assert_eq!(processed.metadata.last_updated.as_deref(), Some("3 March 2022"));
        assert!(!processed.chunks[0].text.contains("Updated"));
        assert!(!processed.chunks[0].text.contains("Page 1"));
    }

    #[test]
    fn test_multi_chunk_document_invariants() {
        let chunker = TextChunker::new(20, 5, WordTokenizer).unwrap();
        let processor = DocumentProcessor::new(chunker);
        let body = (1..=40)
            .map(|i| format!("Section {} describes rule number {} of the club.", i, i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let processed = processor.process(&RawDocument::text("rules.txt", body)).unwrap();

        let total = processed.chunks.len();
        assert!(total > 1);
        for (i, chunk) in processed.chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i);
            assert_eq!(chunk.metadata.total_chunks, total);
            assert_eq!(chunk.metadata.document, processed.metadata);
            assert!(WordTokenizer.count(&chunk.text) <= 20);
        }
    }

    #[test]
    fn test_reprocessing_reproduces_ids() {
        let doc = RawDocument::text("chess.txt", "The name of this organization shall be the Chess Club. Dues are $5.");
        let first = processor().process(&doc).unwrap();
        let second = processor().process(&doc).unwrap();

        let ids = |p: &crate::ProcessedDocument| p.chunks.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert!(first.chunks[0].id.starts_with("Chess_Club_0_"));
    }

    #[test]
    fn test_document_of_only_footers_is_empty() {
        let doc = RawDocument::text("footer.txt", "2 Updated 1 May 2020\nPage 2");
        assert!(matches!(processor().process(&doc), Err(ExtractionError::EmptyText(_))));
    }

    #[test]
    fn test_invalid_encoding_is_reported() {
        let doc = RawDocument::new("latin1.txt", vec![b'c', 0xe9, b'!'], DocumentFormat::Text);
        assert!(matches!(processor().process(&doc), Err(ExtractionError::Encoding(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ChunkingConfig {
            chunk_size: 10,
            chunk_overlap: 20,
        };
        assert!(matches!(
            DocumentProcessor::from_config(&config),
            Err(ExtractionError::Config(_))
        ));
    }
}
