//! Token-bounded, overlapping text chunking
//!
//! Chunking runs in two phases over byte ranges of the input:
//!
//! 1. **Split**: spans are broken on the coarsest separator they contain
//!    (paragraph, line, sentence, word) until every piece fits in
//!    `max_tokens - overlap_tokens`. Separators stay attached to the end of
//!    the span they terminate, so pieces tile the input exactly.
//! 2. **Merge**: adjacent pieces are packed greedily into chunks of at most
//!    `max_tokens`. Each new chunk starts with the trailing `overlap_tokens`
//!    tokens of the previous one.
//!
//! Because pieces leave room for the overlap, a seed plus the next piece
//! always fits, and neighbouring chunks share the full overlap.

use crate::config::ChunkingConfig;
use crate::tokenizer::WordTokenizer;
use clubhouse_domain::{ConfigError, Tokenizer};
use std::ops::Range;

/// Separators, coarsest first. The empty separator means "force split".
const SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Splits text into overlapping chunks bounded by a token count
///
/// # Examples
///
/// ```
/// use clubhouse_extractor::{TextChunker, WordTokenizer};
///
/// let chunker = TextChunker::new(4, 1, WordTokenizer).unwrap();
/// let chunks = chunker.chunk("one two three four five six");
/// assert_eq!(chunks, vec!["one two three four", "four five six"]);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker<T: Tokenizer = WordTokenizer> {
    max_tokens: usize,
    overlap_tokens: usize,
    tokenizer: T,
}

impl TextChunker<WordTokenizer> {
    /// Build a chunker with the default tokenizer from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap, WordTokenizer)
    }
}

impl<T: Tokenizer> TextChunker<T> {
    /// Create a new chunker
    ///
    /// Fails if `max_tokens` is zero or `overlap_tokens >= max_tokens`.
    pub fn new(max_tokens: usize, overlap_tokens: usize, tokenizer: T) -> Result<Self, ConfigError> {
        if max_tokens == 0 {
            return Err(ConfigError::out_of_range("chunk_size", "must be greater than 0"));
        }
        if overlap_tokens >= max_tokens {
            return Err(ConfigError::OverlapTooLarge {
                size: max_tokens,
                overlap: overlap_tokens,
            });
        }
        Ok(Self {
            max_tokens,
            overlap_tokens,
            tokenizer,
        })
    }

    /// Maximum tokens per chunk
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokens shared between consecutive chunks
    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    /// The tokenizer used for sizing
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Chunk the given text
    ///
    /// Returns trimmed, non-empty chunks in document order. Blank input
    /// yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let pieces = self.split(text);
        self.merge(text, &pieces)
            .into_iter()
            .map(|range| text[range].trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    /// Phase 1: cut the input into contiguous pieces that leave room for overlap
    fn split(&self, text: &str) -> Vec<Range<usize>> {
        let piece_limit = self.max_tokens - self.overlap_tokens;
        let mut pieces = Vec::new();
        let mut stack: Vec<(Range<usize>, usize)> = vec![(0..text.len(), 0)];

        while let Some((range, level)) = stack.pop() {
            if range.is_empty() {
                continue;
            }
            let span = &text[range.clone()];
            // A single character is never split, whatever its count
            if self.tokenizer.count(span) <= piece_limit || is_single_char(span) {
                pieces.push(range);
                continue;
            }

            let separator = SEPARATORS[level..]
                .iter()
                .enumerate()
                .find(|(_, sep)| !sep.is_empty() && span.contains(**sep));

            let parts = match separator {
                Some((offset, sep)) => split_keeping_separator(span, sep)
                    .into_iter()
                    .map(|part| (part, level + offset + 1))
                    .collect::<Vec<_>>(),
                None => self
                    .force_split(span, piece_limit)
                    .into_iter()
                    .map(|part| (part, SEPARATORS.len() - 1))
                    .collect(),
            };

            // Reverse so the leftmost part is processed next
            for (part, next_level) in parts.into_iter().rev() {
                stack.push((range.start + part.start..range.start + part.end, next_level));
            }
        }

        pieces
    }

    /// Cut a separator-free span at token starts, `limit` tokens per part
    ///
    /// Falls back to one part per character when the token starts give no
    /// cut, so every part is strictly shorter than `span`.
    fn force_split(&self, span: &str, limit: usize) -> Vec<Range<usize>> {
        let spans = self.tokenizer.token_spans(span);
        let mut cuts: Vec<usize> = spans
            .iter()
            .step_by(limit)
            .skip(1)
            .map(|t| t.start)
            .filter(|&start| start > 0 && start < span.len())
            .collect();
        if cuts.is_empty() {
            return span.char_indices().map(|(i, c)| i..i + c.len_utf8()).collect();
        }
        cuts.insert(0, 0);
        cuts.push(span.len());
        cuts.windows(2).map(|w| w[0]..w[1]).filter(|r| !r.is_empty()).collect()
    }

    /// Phase 2: pack pieces into chunks, seeding each chunk with overlap
    fn merge(&self, text: &str, pieces: &[Range<usize>]) -> Vec<Range<usize>> {
        let mut chunks = Vec::new();
        let mut current: Option<Range<usize>> = None;

        for piece in pieces {
            let Some(cur) = current.take() else {
                current = Some(piece.clone());
                continue;
            };

            let candidate = cur.start..piece.end;
            if self.tokenizer.count(&text[candidate.clone()]) <= self.max_tokens {
                current = Some(candidate);
                continue;
            }

            let seed_start = self.seed_start(text, &cur, piece);
            chunks.push(cur);
            current = Some(seed_start..piece.end);
        }

        chunks.extend(current);
        chunks
    }

    /// Byte offset where the next chunk begins: the trailing overlap tokens of
    /// `emitted`, dropping leading tokens only if seed plus `next` is too long.
    fn seed_start(&self, text: &str, emitted: &Range<usize>, next: &Range<usize>) -> usize {
        let tokens = self.tokenizer.token_spans(&text[emitted.clone()]);
        let mut index = tokens.len() - self.overlap_tokens.min(tokens.len());

        loop {
            let start = tokens
                .get(index)
                .map(|t| emitted.start + t.start)
                .unwrap_or(next.start);
            if start >= next.start || self.tokenizer.count(&text[start..next.end]) <= self.max_tokens {
                return start;
            }
            index += 1;
        }
    }
}

fn is_single_char(span: &str) -> bool {
    let mut chars = span.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Split `span` after each occurrence of `sep`; relative byte ranges
fn split_keeping_separator(span: &str, sep: &str) -> Vec<Range<usize>> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (idx, matched) in span.match_indices(sep) {
        let end = idx + matched.len();
        parts.push(start..end);
        start = end;
    }
    if start < span.len() {
        parts.push(start..span.len());
    }
    parts
}
