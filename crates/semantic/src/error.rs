use std::io;
use std::path::PathBuf;

use lexicon::LexiconError;
use thiserror::Error;

/// Errors raised while loading the embedding model or its companions.
///
/// All of these are fatal for the process: the pipeline cannot run without a
/// well-formed model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SemanticError {
    /// The model file could not be opened or read.
    #[error("failed to read word vectors from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The model file does not follow the word2vec layout.
    #[error("malformed word vectors at {location}: {message}")]
    Format { location: String, message: String },
    /// A vector whose length differs from the model dimension.
    #[error("vector for `{word}` has {actual} components, expected {expected}")]
    Dimension {
        word: String,
        expected: usize,
        actual: usize,
    },
    /// Configuration is inconsistent (e.g. a zero-dimension model).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Stop-word or lemma resources failed to load.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

/// Errors raised while turning text into a document vector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VectorizeError {
    /// Nothing survived vocabulary and stop-word filtering. This is a client
    /// error: the input simply carries no usable words.
    #[error("Valid tokens not found in user input")]
    NoValidTokens,
}
