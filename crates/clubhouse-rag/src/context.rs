//! Context block and citation construction

use clubhouse_domain::{Citation, SearchMatch};

/// Characters of chunk text kept in a citation snippet
pub const SNIPPET_CHARS: usize = 150;

/// Builds the numbered context block handed to the LLM
///
/// Match `r` (1-based, in rank order) becomes `[Source r]` in the context and
/// the citation with `source_number == r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    /// Build the context block and its parallel citation list
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::{ChunkMetadata, Metadata, SearchMatch};
    /// use clubhouse_rag::ContextBuilder;
    ///
    /// let m = SearchMatch {
    ///     id: "chess_0".to_string(),
    ///     score: 0.8,
    ///     text: "Meets Tuesdays.".to_string(),
    ///     metadata: ChunkMetadata {
    ///         document: Metadata::for_source("chess_club.txt"),
    ///         chunk_index: 0,
    ///         total_chunks: 1,
    ///     },
    /// };
    /// let (context, citations) = ContextBuilder::build(&[m]);
    /// assert_eq!(context, "[Source 1] Chess Club:\nMeets Tuesdays.\n");
    /// assert_eq!(citations[0].source_number, 1);
    /// ```
    pub fn build(matches: &[SearchMatch]) -> (String, Vec<Citation>) {
        let mut blocks = Vec::with_capacity(matches.len());
        let mut citations = Vec::with_capacity(matches.len());

        for (idx, m) in matches.iter().enumerate() {
            let source_number = idx + 1;
            let club_name = m.metadata.document.display_name();
            blocks.push(format!("[Source {}] {}:\n{}\n", source_number, club_name, m.text));

            let source_file = &m.metadata.document.source_file;
            citations.push(Citation {
                source_number,
                club_name,
                source_file: (!source_file.is_empty()).then(|| source_file.clone()),
                relevance_score: m.score,
                text_snippet: snippet(&m.text),
            });
        }

        (blocks.join("\n"), citations)
    }
}

/// First `SNIPPET_CHARS` characters, with "..." when cut
fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
