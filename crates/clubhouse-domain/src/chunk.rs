//! Chunk - the atomic retrieval unit

use crate::metadata::ChunkMetadata;
use serde::{Deserialize, Serialize};

/// A bounded, contiguous span of a document's text, tagged with positional
/// and document metadata.
///
/// Chunks are immutable once assembled. The `id` is deterministic so that
/// re-ingesting an unchanged document overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identity: `<sanitized club or file>_<index>_<short hash>`
    pub id: String,

    /// Chunk text
    pub text: String,

    /// Document metadata plus position
    pub metadata: ChunkMetadata,
}
