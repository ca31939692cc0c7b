//! Default tokenizer used for chunk sizing

use clubhouse_domain::Tokenizer;
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    // A run of word characters, or a single punctuation mark
    static ref TOKEN_REGEX: Regex = Regex::new(r"\w+|[^\w\s]").unwrap();
}

/// Counts words and punctuation marks as tokens
///
/// Approximates subword tokenizers closely enough for sizing chunks, and
/// never splits inside a word.
///
/// # Examples
///
/// ```
/// use clubhouse_domain::Tokenizer;
/// use clubhouse_extractor::WordTokenizer;
///
/// assert_eq!(WordTokenizer.count("Dues are $10."), 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn token_spans(&self, text: &str) -> Vec<Range<usize>> {
        TOKEN_REGEX.find_iter(text).map(|m| m.range()).collect()
    }

    fn count(&self, text: &str) -> usize {
        TOKEN_REGEX.find_iter(text).count()
    }
}
