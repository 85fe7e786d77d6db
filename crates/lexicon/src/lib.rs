//! papervec lexical analysis
//!
//! Turns plain text into lemmas the embedding model can look up. The stage is
//! deliberately light: Unicode normalization, word-boundary tokenization and a
//! rule-based lemmatizer. No tagging, parsing or entity recognition runs.
//!
//! | Step | What happens |
//! |------|--------------|
//! | Normalize | Optional NFKC fold |
//! | Tokenize | UAX #29 word boundaries, whitespace dropped |
//! | Lemmatize | Exceptions, then vocabulary-gated suffix rules |
//!
//! Stop-word filtering lives here as a resource ([`StopWords`]) but is applied
//! by the vectorizer together with the vocabulary check.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashSet;
//! use lexicon::{Lexicon, LexiconConfig};
//!
//! let vocab: HashSet<String> = ["cell", "divide"].iter().map(|s| s.to_string()).collect();
//! let lexicon = Lexicon::from_config(&LexiconConfig::default()).unwrap();
//!
//! let lemmas: Vec<String> = lexicon
//!     .analyze("Cells divided.", &vocab)
//!     .into_iter()
//!     .map(|t| t.lemma)
//!     .collect();
//! assert_eq!(lemmas, vec!["cell", "divide", "."]);
//! ```
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

mod config;
mod error;
mod lemmatizer;
mod stopwords;
mod token;

pub use crate::config::LexiconConfig;
pub use crate::error::LexiconError;
pub use crate::lemmatizer::{Lemmatizer, Vocabulary};
pub use crate::stopwords::{StopWords, ENGLISH_STOP_WORDS};
pub use crate::token::{tokenize, Token};

/// A token paired with its lemma.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LemmaToken {
    /// Surface token with offsets into the normalized text.
    pub token: Token,
    pub lemma: String,
}

/// Loaded analysis resources: lemmatizer, stop words and normalization flags.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Lexicon {
    lemmatizer: Lemmatizer,
    stop_words: StopWords,
    normalize_unicode: bool,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(Lemmatizer::english(), StopWords::english())
    }
}

impl Lexicon {
    pub fn new(lemmatizer: Lemmatizer, stop_words: StopWords) -> Self {
        Self {
            lemmatizer,
            stop_words,
            normalize_unicode: true,
        }
    }

    /// Builds the resources described by `cfg`, reading any configured files.
    pub fn from_config(cfg: &LexiconConfig) -> Result<Self, LexiconError> {
        let mut lemmatizer = Lemmatizer::english();
        if !cfg.lowercase {
            lemmatizer = lemmatizer.preserve_case();
        }
        if let Some(path) = &cfg.lemma_lookup_path {
            lemmatizer = lemmatizer.with_lookup_file(path)?;
        }

        let stop_words = match &cfg.stop_words_path {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };

        debug!(
            stop_words = stop_words.len(),
            lemma_exceptions = lemmatizer.exception_count(),
            "lexicon_loaded"
        );

        Ok(Self {
            lemmatizer,
            stop_words,
            normalize_unicode: cfg.normalize_unicode,
        })
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    /// Returns true when `lemma` is a stop word.
    pub fn is_stop_word(&self, lemma: &str) -> bool {
        self.stop_words.contains(lemma)
    }

    /// Tokenizes and lemmatizes `text`.
    ///
    /// Token offsets refer to the NFKC-normalized text when normalization is
    /// enabled.
    pub fn analyze<V: Vocabulary + ?Sized>(&self, text: &str, vocab: &V) -> Vec<LemmaToken> {
        let normalized: Cow<str> = if self.normalize_unicode {
            Cow::Owned(text.nfkc().collect::<String>())
        } else {
            Cow::Borrowed(text)
        };

        tokenize(&normalized)
            .into_iter()
            .map(|token| {
                let lemma = self.lemmatizer.lemmatize(&token.text, vocab);
                LemmaToken { token, lemma }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    fn vocab(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn analyze_normalizes_ligatures() {
        let lexicon = Lexicon::default();
        let tokens = lexicon.analyze("e\u{FB03}cient", &vocab(&[]));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].lemma, "efficient");
    }

    #[test]
    fn analyze_without_normalization_keeps_source_offsets() {
        let cfg = LexiconConfig {
            normalize_unicode: false,
            ..Default::default()
        };
        let lexicon = Lexicon::from_config(&cfg).unwrap();
        let text = "Genes were expressed";
        let tokens = lexicon.analyze(text, &vocab(&["gene", "express"]));
        let lemmas: Vec<&str> = tokens.iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["gene", "be", "express"]);
        for t in &tokens {
            assert_eq!(&text[t.token.start..t.token.end], t.token.text);
        }
    }

    #[test]
    fn stop_word_check_uses_configured_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cell").unwrap();
        let cfg = LexiconConfig {
            stop_words_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let lexicon = Lexicon::from_config(&cfg).unwrap();
        assert!(lexicon.is_stop_word("cell"));
        assert!(!lexicon.is_stop_word("the"));
    }

    #[test]
    fn missing_resource_file_fails_construction() {
        let cfg = LexiconConfig {
            lemma_lookup_path: Some("/nonexistent/lemmas.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            Lexicon::from_config(&cfg),
            Err(LexiconError::Io { .. })
        ));
    }
}
