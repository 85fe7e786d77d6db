//! Configuration for text analysis.
//!
//! ```rust
//! use lexicon::LexiconConfig;
//!
//! let config = LexiconConfig::default();
//! assert!(config.normalize_unicode);
//! assert!(config.lowercase);
//! assert!(config.stop_words_path.is_none());
//! ```
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime configuration for [`Lexicon`](crate::Lexicon).
///
/// # Serialization
///
/// ```json
/// {
///   "normalize_unicode": true,
///   "lowercase": true,
///   "stop_words_path": "data/stop_words.txt",
///   "lemma_lookup_path": null
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LexiconConfig {
    /// Apply Unicode NFKC normalization before tokenizing.
    ///
    /// Folds ligatures (`ﬁ` -> `fi`) and full-width forms that PDF extraction
    /// commonly produces.
    pub normalize_unicode: bool,

    /// Lowercase lemmas that no rule or exception produced.
    pub lowercase: bool,

    /// One stop word per line. `None` uses the built-in English list.
    pub stop_words_path: Option<PathBuf>,

    /// JSON `{form: lemma}` table merged over the built-in exceptions.
    pub lemma_lookup_path: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            lowercase: true,
            stop_words_path: None,
            lemma_lookup_path: None,
        }
    }
}
