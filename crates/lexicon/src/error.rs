use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading lexical resources.
///
/// Analysis itself never fails; only reading stop-word lists and lemma lookup
/// tables can.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LexiconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lemma lookup table {path}: {source}")]
    LookupTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid lexicon configuration: {0}")]
    InvalidConfig(String),
}
