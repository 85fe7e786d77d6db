use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by lookups and by the reference-embeddings harness.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IndexError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file holds a header but no data rows (or nothing at all).
    #[error("{path} contains no data rows")]
    EmptyFile { path: PathBuf },
    #[error("malformed row at {location}: {message}")]
    MalformedRow { location: String, message: String },
    /// Query array is not a single row of the lookup's dimension.
    #[error("query has shape ({rows}, {cols}), expected (1, {expected})")]
    QueryShape {
        rows: usize,
        cols: usize,
        expected: usize,
    },
    #[error("vector for `{id}` has {actual} components, expected {expected}")]
    Dimension {
        id: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid index config: {0}")]
    InvalidConfig(String),
    /// A reference row did not find itself as its own nearest neighbor.
    #[error("validation failed for `{id}`: {reason}")]
    ValidationFailed { id: String, reason: String },
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Rewrites the location of a [`IndexError::MalformedRow`]; other
    /// variants pass through.
    pub(crate) fn at(self, location: impl Into<String>) -> Self {
        match self {
            Self::MalformedRow { message, .. } => Self::MalformedRow {
                location: location.into(),
                message,
            },
            other => other,
        }
    }
}
