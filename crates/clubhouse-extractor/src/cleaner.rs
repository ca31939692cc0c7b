//! Text normalization before metadata extraction and chunking

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Running page footer: "12 Updated 10 October 2021"
    static ref FOOTER_REGEX: Regex = Regex::new(
        r"\b\d+\s*Updated\s+(\d+\s+\w+\s+\d{4})\b"
    ).unwrap();

    // Pagination: "Page 3" or "Page 3 of 7"
    static ref PAGE_REGEX: Regex = Regex::new(
        r"\bPage\s+\d+(?:\s+of\s+\d+)?\b"
    ).unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips page furniture and normalizes whitespace
///
/// # Examples
///
/// ```
/// use clubhouse_extractor::TextCleaner;
///
/// let cleaned = TextCleaner::clean("Article I\n\n  Name  Page 2 of 9\n4 Updated 10 October 2021");
/// assert_eq!(cleaned, "Article I Name");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner;

impl TextCleaner {
    /// Clean text. Idempotent: `clean(clean(x)) == clean(x)`.
    pub fn clean(text: &str) -> String {
        let mut current = Self::clean_once(text);
        loop {
            // A removal can join text into a new footer, so repeat until stable
            let next = Self::clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(text: &str) -> String {
        let text = FOOTER_REGEX.replace_all(text, "");
        let text = PAGE_REGEX.replace_all(&text, "");
        let text = WHITESPACE_REGEX.replace_all(&text, " ");
        text.trim().to_string()
    }

    /// Date carried by the first page footer in `raw`, e.g. "10 October 2021"
    ///
    /// Footers are removed by [`TextCleaner::clean`], so this reads the
    /// uncleaned text.
    pub fn footer_date(raw: &str) -> Option<String> {
        FOOTER_REGEX
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| WHITESPACE_REGEX.replace_all(m.as_str(), " ").into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(TextCleaner::clean("  a \n\n b\t\tc  "), "a b c");
    }

    #[test]
    fn test_removes_footers_and_pages() {
        let raw = "Section 1. Dues are $5.\n3 Updated 10 October 2021\nPage 3 of 7\nSection 2. Officers.";
        assert_eq!(TextCleaner::clean(raw), "Section 1. Dues are $5. Section 2. Officers.");
    }

    #[test]
    fn test_leaves_plain_updated_sentence() {
        let raw = "Updated 10 October 2021. Paying a yearly fee of $10.";
        assert_eq!(TextCleaner::clean(raw), raw);
    }

    #[test]
    fn test_idempotent_after_footer_removal() {
        let raw = "1 Page 2 Updated 3 May 2020 end";
        let once = TextCleaner::clean(raw);
        assert_eq!(TextCleaner::clean(&once), once);
        assert!(!once.contains("Updated"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TextCleaner::clean(""), "");
        assert_eq!(TextCleaner::clean(" \n "), "");
    }

    #[test]
    fn test_footer_date() {
        let raw = "Bylaws\n7 Updated 10  October 2021\n";
        assert_eq!(TextCleaner::footer_date(raw), Some("10 October 2021".to_string()));
        assert_eq!(TextCleaner::footer_date("no footer"), None);
    }
}
