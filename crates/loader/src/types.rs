//! Core data model types for the loader crate.
//!
//! A [`Document`] is the transient unit of work: raw bytes plus a
//! [`DocumentFormat`] tag. Nothing here is persisted; a document lives for the
//! duration of one extraction call.
//!
//! ```rust
//! use loader::{Document, DocumentFormat};
//!
//! let doc = Document::xml(b"<article/>".to_vec());
//! assert_eq!(doc.format, DocumentFormat::Xml);
//! assert_eq!(doc.len(), 10);
//! ```
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoaderError;

/// Format tag carried alongside raw document bytes.
///
/// Parses from `"xml"` / `"pdf"` (case-insensitive) and can be inferred from a
/// file extension.
///
/// ```rust
/// use loader::DocumentFormat;
/// use std::path::Path;
///
/// assert_eq!("PDF".parse::<DocumentFormat>().unwrap(), DocumentFormat::Pdf);
/// assert_eq!(
///     DocumentFormat::from_path(Path::new("paper.nxml")),
///     Some(DocumentFormat::Xml)
/// );
/// assert_eq!(DocumentFormat::from_path(Path::new("paper.docx")), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Structured full text (JATS and friends).
    Xml,
    /// Portable Document Format.
    Pdf,
}

impl DocumentFormat {
    /// Lowercase label used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Xml => "xml",
            DocumentFormat::Pdf => "pdf",
        }
    }

    /// Infers the format from a file extension. `.xml` and `.nxml` map to XML,
    /// `.pdf` to PDF; anything else is unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xml" | "nxml" => Some(DocumentFormat::Xml),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(DocumentFormat::Xml),
            "pdf" => Ok(DocumentFormat::Pdf),
            other => Err(LoaderError::UnknownFormat(other.to_string())),
        }
    }
}

/// Raw document content plus its format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Undecoded document bytes as received from the caller.
    pub content: Vec<u8>,
    /// How `content` should be interpreted.
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(content: impl Into<Vec<u8>>, format: DocumentFormat) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    pub fn xml(content: impl Into<Vec<u8>>) -> Self {
        Self::new(content, DocumentFormat::Xml)
    }

    pub fn pdf(content: impl Into<Vec<u8>>) -> Self {
        Self::new(content, DocumentFormat::Pdf)
    }

    /// Size of the raw payload in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
