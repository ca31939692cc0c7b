//! Metadata filter inference from free-text questions

use clubhouse_domain::{Filter, FilterOp, FilterValue, Predicate};
use lazy_static::lazy_static;
use regex::Regex;

/// Where a rule's value comes from
#[derive(Debug, Clone, Copy)]
enum RuleValue {
    /// Capture group 1, parsed as a number
    Captured,
    /// A constant
    Fixed(f64),
}

#[derive(Debug, Clone)]
struct FilterRule {
    field: &'static str,
    op: FilterOp,
    pattern: Regex,
    value: RuleValue,
}

impl FilterRule {
    fn new(field: &'static str, op: FilterOp, pattern: &str, value: RuleValue) -> Self {
        Self {
            field,
            op,
            pattern: Regex::new(pattern).unwrap(),
            value,
        }
    }

    /// Value of the first occurrence in `query`, if it parses
    fn apply(&self, query: &str) -> Option<f64> {
        let caps = self.pattern.captures(query)?;
        match self.value {
            RuleValue::Fixed(value) => Some(value),
            RuleValue::Captured => caps.get(1)?.as_str().replace(',', "").parse::<f64>().ok(),
        }
    }
}

/// Dollar amount, optionally with thousands separators and decimals
const AMOUNT: &str = r"(\d[\d,]*(?:\.\d+)?)";

lazy_static! {
    // Table order is priority order
    static ref FILTER_RULES: Vec<FilterRule> = vec![
        FilterRule::new(
            "dues",
            FilterOp::Lte,
            &format!(
                r"(?i)\b(?:under|less\s+than|below|at\s+most|no\s+more\s+than|max(?:imum)?(?:\s+of)?|cheaper\s+than)\s*\$?\s*{}",
                AMOUNT
            ),
            RuleValue::Captured,
        ),
        FilterRule::new(
            "dues",
            FilterOp::Lte,
            &format!(r"(?i)\${}\s*(?:or\s+less|or\s+under|max(?:imum)?)\b", AMOUNT),
            RuleValue::Captured,
        ),
        FilterRule::new(
            "dues",
            FilterOp::Eq,
            r"(?i)\b(?:no\s+(?:dues|fees?)|free\s+to\s+join|free\s+of\s+charge)\b",
            RuleValue::Fixed(0.0),
        ),
    ];
}

/// Infers structured constraints from a question
///
/// Rules run in table order. The first rule that yields a value for a field
/// wins and later rules for that field are skipped; rules for different
/// fields accumulate.
///
/// # Examples
///
/// ```
/// use clubhouse_rag::FilterExtractor;
///
/// let extractor = FilterExtractor::new();
/// let filter = extractor.extract("What clubs have dues under $20?");
/// assert_eq!(filter.to_string(), "dues lte 20");
/// assert!(extractor.extract("What is this club?").is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterExtractor;

impl FilterExtractor {
    /// Create an extractor over the shared rule table
    pub fn new() -> Self {
        Self
    }

    /// Extract a filter from `query`. Never fails; no match is an empty filter.
    pub fn extract(&self, query: &str) -> Filter {
        let mut filter = Filter::new();
        for rule in FILTER_RULES.iter() {
            if filter.constrains(rule.field) {
                continue;
            }
            if let Some(value) = rule.apply(query) {
                filter.push(Predicate::new(rule.field, rule.op, FilterValue::Number(value)));
            }
        }
        filter
    }
}
