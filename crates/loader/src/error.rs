//! Error types produced by the loader crate.
//!
//! Only PDF failures and policy violations surface here. Malformed XML is
//! recovered inside the extractor and never becomes an error.
//!
//! | Error | Category |
//! |-------|----------|
//! | [`Pdf`](LoaderError::Pdf) | Fatal: bytes are not a readable PDF |
//! | [`DocumentTooLarge`](LoaderError::DocumentTooLarge) | Policy: size limit exceeded |
//! | [`InvalidPathQuery`](LoaderError::InvalidPathQuery) | Configuration |
//! | [`InvalidConfig`](LoaderError::InvalidConfig) | Configuration |
//! | [`UnknownFormat`](LoaderError::UnknownFormat) | Caller supplied an unknown format tag |
use thiserror::Error;

/// Errors that can occur while turning a document into plain text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoaderError {
    /// The PDF byte stream could not be opened or a page could not be decoded.
    #[error("pdf extraction failed: {0}")]
    Pdf(String),

    /// Raw document exceeds `LoaderConfig::max_document_bytes`.
    #[error("document of {size} bytes exceeds limit of {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },

    /// The configured path query does not parse.
    #[error("invalid path query: {0}")]
    InvalidPathQuery(String),

    /// Any other inconsistency in `LoaderConfig`.
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// A format tag other than `xml` or `pdf`.
    #[error("unknown document format: {0}")]
    UnknownFormat(String),
}
