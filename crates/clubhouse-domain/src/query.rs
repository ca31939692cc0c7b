//! Query-side data: search matches, citations, and responses

use crate::filter::Filter;
use crate::metadata::ChunkMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one query lifecycle, based on UUIDv7
///
/// Chronologically sortable, so log lines and responses from concurrent
/// queries can be ordered without a shared counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(uuid::Uuid);

impl QueryId {
    /// Generate a new UUIDv7-based QueryId
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::QueryId;
    ///
    /// let a = QueryId::new();
    /// let b = QueryId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a QueryId from its string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0.as_u128() >> 80) as u64
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Chunk id
    pub id: String,
    /// Relevance in `[0, 1]`, higher is better
    pub score: f64,
    /// Chunk text
    pub text: String,
    /// Chunk metadata as stored
    pub metadata: ChunkMetadata,
}

/// A numbered reference from an answer back to a retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based number matching the `[Source N]` label in the context
    pub source_number: usize,
    /// Display name of the club
    pub club_name: String,
    /// File the chunk came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Score of the underlying match
    pub relevance_score: f64,
    /// Leading characters of the chunk text
    pub text_snippet: String,
}

/// Result of answering a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Query lifecycle identifier
    pub query_id: QueryId,
    /// Generated (or fixed fallback) answer text
    pub answer: String,
    /// Citations in rank order
    pub citations: Vec<Citation>,
    /// Ranked matches the answer was grounded on
    pub retrieved_chunks: Vec<SearchMatch>,
    /// Filter used for retrieval
    pub filters_applied: Filter,
}

/// Stages of a query, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStage {
    /// Question accepted
    Received,
    /// Structured filters inferred (or supplied)
    FiltersExtracted,
    /// Matches fetched from the store
    Retrieved,
    /// Context block and citations assembled
    ContextBuilt,
    /// Answer generated by the LLM
    Generated,
    /// Response packaged
    Completed,
}

impl QueryStage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStage::Received => "received",
            QueryStage::FiltersExtracted => "filters_extracted",
            QueryStage::Retrieved => "retrieved",
            QueryStage::ContextBuilt => "context_built",
            QueryStage::Generated => "generated",
            QueryStage::Completed => "completed",
        }
    }
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_id_round_trips_through_string() {
        let id = QueryId::new();
        let parsed = QueryId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_query_ids_sort_chronologically() {
        let first = QueryId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = QueryId::new();
        assert!(first < second);
        assert!(first.timestamp() <= second.timestamp());
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(QueryStage::Received < QueryStage::FiltersExtracted);
        assert!(QueryStage::Generated < QueryStage::Completed);
        assert_eq!(QueryStage::ContextBuilt.to_string(), "context_built");
    }

    #[test]
    fn test_citation_omits_missing_source_file() {
        let citation = Citation {
            source_number: 1,
            club_name: "Chess Club".to_string(),
            source_file: None,
            relevance_score: 0.9,
            text_snippet: "The Chess Club meets".to_string(),
        };
        let value = serde_json::to_value(&citation).unwrap();
        assert!(value.get("source_file").is_none());
        assert_eq!(value["source_number"], 1);
    }
}
