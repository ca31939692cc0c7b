//! Chunk assembly: attach metadata and stable ids to chunk texts

use clubhouse_domain::{Chunk, ChunkMetadata, Metadata};
use sha2::{Digest, Sha256};

/// Hex characters of the content hash kept in a chunk id
const SHORT_HASH_LEN: usize = 8;

/// Turns chunk texts into [`Chunk`]s for one document
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkAssembler;

impl ChunkAssembler {
    /// Assemble chunks in order
    ///
    /// Every chunk gets the same base metadata, a dense `chunk_index` and the
    /// document's `total_chunks`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::Metadata;
    /// use clubhouse_extractor::ChunkAssembler;
    ///
    /// let meta = Metadata::for_source("chess club.txt");
    /// let chunks = ChunkAssembler::assemble(vec!["Dues are $5.".to_string()], &meta);
    /// assert_eq!(chunks[0].metadata.total_chunks, 1);
    /// assert!(chunks[0].id.starts_with("chess_club_txt_0_"));
    /// ```
    pub fn assemble(texts: Vec<String>, metadata: &Metadata) -> Vec<Chunk> {
        let total_chunks = texts.len();
        let base = metadata
            .club_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&metadata.source_file);
        let prefix = sanitize(base);

        texts
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk {
                id: format!("{}_{}_{}", prefix, chunk_index, short_hash(&text)),
                text,
                metadata: ChunkMetadata {
                    document: metadata.clone(),
                    chunk_index,
                    total_chunks,
                },
            })
            .collect()
    }
}

/// Reduce a name to `[A-Za-z0-9-]` runs joined by `_`
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        "document".to_string()
    } else {
        out
    }
}

/// First hex characters of the SHA-256 of `text`
pub fn short_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(SHORT_HASH_LEN);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Accessibility Club"), "Accessibility_Club");
        assert_eq!(sanitize("  Chess & Go -- Society!! "), "Chess_Go_--_Society");
        assert_eq!(sanitize("club.pdf"), "club_pdf");
        assert_eq!(sanitize("???"), "document");
        assert_eq!(sanitize("Café"), "Caf");
    }

    #[test]
    fn test_short_hash_is_stable() {
        assert_eq!(short_hash("abc"), "ba7816bf");
        assert_eq!(short_hash("abc").len(), 8);
    }

    #[test]
    fn test_assemble_dense_indices() {
        let meta = Metadata {
            club_name: Some("Robotics Club".to_string()),
            ..Metadata::for_source("robotics.pdf")
        };
        let chunks = ChunkAssembler::assemble(vec!["one".into(), "two".into(), "three".into()], &meta);

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i);
            assert_eq!(chunk.metadata.total_chunks, 3);
            assert_eq!(chunk.metadata.document, meta);
            assert!(chunk.id.starts_with(&format!("Robotics_Club_{}_", i)));
        }
    }

    #[test]
    fn test_ids_are_reproducible() {
        let meta = Metadata::for_source("a.txt");
        let first = ChunkAssembler::assemble(vec!["same text".into()], &meta);
        let second = ChunkAssembler::assemble(vec!["same text".into()], &meta);
        assert_eq!(first[0].id, second[0].id);

        let changed = ChunkAssembler::assemble(vec!["other text".into()], &meta);
        assert_ne!(first[0].id, changed[0].id);
    }

    #[test]
    fn test_blank_club_name_falls_back_to_source() {
        let meta = Metadata {
            club_name: Some("   ".to_string()),
            ..Metadata::for_source("go_club.txt")
        };
        let chunks = ChunkAssembler::assemble(vec!["x".into()], &meta);
        assert!(chunks[0].id.starts_with("go_club_txt_0_"));
    }
}
