use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A token with its UTF-8 byte offsets in the analyzed text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the analyzed text.
    pub start: usize,
    /// Byte offset (exclusive) in the analyzed text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits `text` on Unicode word boundaries (UAX #29).
///
/// Whitespace segments are dropped. Punctuation and symbols stay as their own
/// tokens so offsets cover every non-space character. Words with inner
/// apostrophes or periods (`don't`, `e.g`) and decimal numbers (`3.14`) stay
/// whole, following the boundary rules.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
        .map(|(start, segment)| Token {
            text: segment.to_string(),
            start,
            end: start + segment.len(),
        })
        .collect()
}
