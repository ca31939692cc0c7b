//! Structured retrieval filters
//!
//! A [`Filter`] is a conjunction of predicates over flat chunk metadata.
//! Stores translate it into their native query language; [`Filter::matches`]
//! evaluates it locally for stores that cannot.

use crate::metadata::ChunkMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    /// Less than or equal
    Lte,
    /// Equal
    Eq,
}

impl FilterOp {
    /// Get the operator name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Lte => "lte",
            FilterOp::Eq => "eq",
        }
    }
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// A single `field op value` constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Flat metadata field name, e.g. "dues"
    pub field: String,
    /// Comparison operator
    #[serde(rename = "operator")]
    pub op: FilterOp,
    /// Value to compare against
    pub value: FilterValue,
}

impl Predicate {
    /// Create a new predicate
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Evaluate against chunk metadata. An absent field never matches.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        let Some(actual) = field_value(metadata, &self.field) else {
            return false;
        };

        match (&actual, &self.value, self.op) {
            (FilterValue::Number(a), FilterValue::Number(b), FilterOp::Lte) => a <= b,
            (FilterValue::Number(a), FilterValue::Number(b), FilterOp::Eq) => (a - b).abs() < f64::EPSILON,
            (FilterValue::Text(a), FilterValue::Text(b), FilterOp::Eq) => a == b,
            (FilterValue::Text(a), FilterValue::Text(b), FilterOp::Lte) => a <= b,
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.as_str(), self.value)
    }
}

/// Look up a flat metadata field by name
fn field_value(metadata: &ChunkMetadata, field: &str) -> Option<FilterValue> {
    let doc = &metadata.document;
    let text = |v: &Option<String>| v.clone().map(FilterValue::Text);

    match field {
        "dues" => doc.dues.map(FilterValue::Number),
        "club_name" => text(&doc.club_name),
        "meeting_frequency" => text(&doc.meeting_frequency),
        "last_updated" => text(&doc.last_updated),
        "membership_requirements" => text(&doc.membership_requirements),
        "source_file" => Some(FilterValue::Text(doc.source_file.clone())),
        "chunk_index" => Some(FilterValue::Number(metadata.chunk_index as f64)),
        "total_chunks" => Some(FilterValue::Number(metadata.total_chunks as f64)),
        _ => None,
    }
}

/// Ordered conjunction of predicates. Empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    ///
    /// # Examples
    ///
    /// ```
    /// use clubhouse_domain::{Filter, FilterOp, FilterValue, Predicate};
    ///
    /// let filter = Filter::new().with(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(20.0)));
    /// assert_eq!(filter.len(), 1);
    /// assert_eq!(filter.to_string(), "dues lte 20");
    /// ```
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append a predicate
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Whether any predicate already constrains `field`
    pub fn constrains(&self, field: &str) -> bool {
        self.predicates.iter().any(|p| p.field == field)
    }

    /// Predicates in insertion order
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of predicates
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True when the filter places no constraint
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate every predicate locally
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        self.predicates.iter().all(|p| p.matches(metadata))
    }
}

impl From<Vec<Predicate>> for Filter {
    fn from(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(" and "))
    }
}
