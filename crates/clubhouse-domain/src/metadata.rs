//! Document and chunk metadata
//!
//! Every field except `source_file` is optional: a document that never states
//! its dues simply has `dues: None`. Absence is a valid state, not an error.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured fields extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Official club name, e.g. "Accessibility Club"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,

    /// Membership dues in dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dues: Option<f64>,

    /// How often the club meets, e.g. "every 2 months"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_frequency: Option<String>,

    /// Document revision date, e.g. "10 October 2021"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Excerpt of the membership/eligibility section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_requirements: Option<String>,

    /// File the document was read from
    #[serde(default)]
    pub source_file: String,
}

impl Metadata {
    /// Create empty metadata for a source file
    pub fn for_source(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Default::default()
        }
    }

    /// Name to show a reader: the club name, else the title-cased file stem,
    /// else "Unknown Club".
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::Metadata;
    ///
    /// let meta = Metadata::for_source("chess_club.pdf");
    /// assert_eq!(meta.display_name(), "Chess Club");
    /// ```
    pub fn display_name(&self) -> String {
        if let Some(name) = self.club_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }

        let stem = std::path::Path::new(&self.source_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let title = stem
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ");

        if title.is_empty() {
            "Unknown Club".to_string()
        } else {
            title
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// Document metadata plus the chunk's position within its document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Document-level fields, identical across all chunks of a document
    #[serde(flatten)]
    pub document: Metadata,

    /// 0-based position of the chunk
    #[serde(default, deserialize_with = "deserialize_count")]
    pub chunk_index: usize,

    /// Number of chunks the document produced
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_chunks: usize,
}

/// Accept counts stored either as integers or as integral floats.
///
/// Hosted vector stores keep every number as a double, so `3` comes back as `3.0`.
fn deserialize_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(serde::de::Error::custom(format!("expected a non-negative integer, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_club_name() {
        let meta = Metadata {
            club_name: Some("  Robotics Society ".to_string()),
            ..Metadata::for_source("robotics.pdf")
        };
        assert_eq!(meta.display_name(), "Robotics Society");
    }

    #[test]
    fn test_display_name_falls_back_to_file_stem() {
        let meta = Metadata::for_source("data/raw/ACCESSIBILITY-club.txt");
        assert_eq!(meta.display_name(), "Accessibility Club");
    }

    #[test]
    fn test_display_name_unknown() {
        assert_eq!(Metadata::default().display_name(), "Unknown Club");
    }

    #[test]
    fn test_serializes_flat_without_absent_fields() {
        let meta = ChunkMetadata {
            document: Metadata {
                dues: Some(10.0),
                ..Metadata::for_source("a.txt")
            },
            chunk_index: 1,
            total_chunks: 3,
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["dues"], 10.0);
        assert_eq!(value["chunk_index"], 1);
        assert_eq!(value["source_file"], "a.txt");
        assert!(value.get("club_name").is_none());
        assert!(value.get("document").is_none());
    }

    #[test]
    fn test_deserializes_float_counts() {
        let json = r#"{"source_file":"a.txt","chunk_index":2.0,"total_chunks":5.0,"text":"ignored"}"#;
        let meta: ChunkMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.chunk_index, 2);
        assert_eq!(meta.total_chunks, 5);
    }

    #[test]
    fn test_rejects_fractional_counts() {
        let json = r#"{"source_file":"a.txt","chunk_index":2.5,"total_chunks":5}"#;
        assert!(serde_json::from_str::<ChunkMetadata>(json).is_err());
    }
}
