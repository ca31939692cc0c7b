//! Rule-based metadata extraction
//!
//! Each field is pulled by an ordered list of patterns. The first pattern that
//! matches wins; a field no pattern matches stays `None`.

use clubhouse_domain::Metadata;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum characters kept from the membership section
const MEMBERSHIP_EXCERPT_CHARS: usize = 200;

lazy_static! {
    static ref CLUB_NAME_REGEX: Regex = Regex::new(
        r"(?i)name of this organization shall be\s+(?:the\s+)?([^.\n]+)"
    ).unwrap();

    // Number within 40 non-digit chars of a dues keyword
    static ref DUES_REGEX: Regex = Regex::new(
        r"(?i)\b(?:dues|fees?|costs?)\b[^\d.]{0,40}?\$?(\d[\d,]*(?:\.\d{1,2})?)"
    ).unwrap();

    // Priority order; the first rule keeps its wording, the rest are lowercased
    static ref MEETING_REGEXES: Vec<Regex> = vec![
        Regex::new(r"(?i)\bmeet(?:s|ing|ings)?\b[^.]*?\b(every\s+(?:other\s+)?(?:\d+\s+)?\w+)").unwrap(),
        Regex::new(r"(?i)\bmeet(?:s|ing|ings)?\s+(weekly|bi-?weekly|monthly|daily|annually|semesterly)\b").unwrap(),
        Regex::new(r"(?i)\b(weekly|bi-?weekly|monthly|daily)\b").unwrap(),
    ];

    static ref UPDATED_REGEX: Regex = Regex::new(
        r"(?i)\bUpdated\s+(\d{1,2}\s+[A-Za-z]+\s+\d{4})"
    ).unwrap();

    static ref MEMBERSHIP_REGEX: Regex = Regex::new(
        r"(?is)\bmembership\b[^:.]{0,80}:\s*(.*?)(?:(?-i:\bArticle\b|\bSection\b)|$)"
    ).unwrap();
}

/// Pulls structured fields out of cleaned document text
///
/// # Examples
///
/// ```
/// use clubhouse_extractor::MetadataExtractor;
///
/// let extractor = MetadataExtractor::new();
/// let meta = extractor.extract("Paying a yearly fee of $10 per school year.", "chess.txt");
/// assert_eq!(meta.dues, Some(10.0));
/// assert_eq!(meta.source_file, "chess.txt");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Create an extractor over the shared rule set
    pub fn new() -> Self {
        Self
    }

    /// Extract every field independently from `text`
    pub fn extract(&self, text: &str, source_file: &str) -> Metadata {
        Metadata {
            club_name: self.club_name(text),
            dues: self.dues(text),
            meeting_frequency: self.meeting_frequency(text),
            last_updated: self.last_updated(text),
            membership_requirements: self.membership_requirements(text),
            source_file: source_file.to_string(),
        }
    }

    fn club_name(&self, text: &str) -> Option<String> {
        let caps = CLUB_NAME_REGEX.captures(text)?;
        let name = caps[1]
            .trim()
            .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}'))
            .trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn dues(&self, text: &str) -> Option<f64> {
        let caps = DUES_REGEX.captures(text)?;
        caps[1].replace(',', "").parse::<f64>().ok()
    }

    fn meeting_frequency(&self, text: &str) -> Option<String> {
        MEETING_REGEXES.iter().enumerate().find_map(|(rule, re)| {
            let found = re.captures(text)?.get(1)?.as_str();
            let found = found.split_whitespace().collect::<Vec<_>>().join(" ");
            // Bare adverbs are normalized; "every ..." phrases keep their wording
            Some(if rule == 0 { found } else { found.to_lowercase() })
        })
    }

    fn last_updated(&self, text: &str) -> Option<String> {
        let caps = UPDATED_REGEX.captures(text)?;
        Some(caps[1].split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn membership_requirements(&self, text: &str) -> Option<String> {
        let caps = MEMBERSHIP_REGEX.captures(text)?;
        let excerpt: String = caps[1].chars().take(MEMBERSHIP_EXCERPT_CHARS).collect();
        let excerpt = excerpt.trim();
        (!excerpt.is_empty()).then(|| excerpt.to_string())
    }
}
