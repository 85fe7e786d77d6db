//! papervec document loader
//!
//! Turns raw document bytes into the plain text the rest of the pipeline
//! analyzes. Two formats are supported:
//!
//! | Format | Strategy |
//! |--------|----------|
//! | XML | Streaming parse with error recovery, tag stripping, path selection |
//! | PDF | Page-by-page text extraction in page order |
//!
//! ## What we do here
//!
//! - **Strip markup noise** - Formatting, cross-reference, table and figure
//!   elements are removed together with their content, so `Protein<sup>2</sup>`
//!   yields `Protein` rather than `Protein2`.
//! - **Select the prose** - Only abstract and body section paragraphs/titles are
//!   kept by default. The selection query is configurable for other schemas.
//! - **Never fail on bad XML** - Mismatched and truncated markup yields whatever
//!   text was collected. Only unreadable PDFs are errors.
//! - **Log everything** - Each load emits a `load_success` or `load_failure`
//!   event with sizes and timing.
//!
//! ## Example
//!
//! ```
//! use loader::{load_text, Document, LoaderConfig};
//!
//! let xml = b"<article><front><abstract><p>Cells <italic>in vitro</italic>divide.</p>\
//!             </abstract></front></article>";
//! let text = load_text(&Document::xml(xml.to_vec()), &LoaderConfig::default()).unwrap();
//! assert_eq!(text, "Cells divide.");
//! ```
use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod error;
mod pdf;
mod query;
mod types;
mod xml;

use crate::xml::XmlExtractor;

pub use crate::config::{LoaderConfig, DEFAULT_PATH_QUERY, DEFAULT_STRIP_TAGS};
pub use crate::error::LoaderError;
pub use crate::query::PathQuery;
pub use crate::types::{Document, DocumentFormat};

/// A loader compiled from a validated [`LoaderConfig`].
///
/// Build once and reuse; the path query and tag sets are parsed up front.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    xml: XmlExtractor,
    max_document_bytes: Option<usize>,
}

impl DocumentLoader {
    /// Validates `cfg` and compiles its path query.
    pub fn new(cfg: &LoaderConfig) -> Result<Self, LoaderError> {
        cfg.validate()?;
        let query: PathQuery = cfg.path_query.parse()?;
        Ok(Self {
            xml: XmlExtractor::new(&cfg.strip_tags, &cfg.unwrap_tags, query),
            max_document_bytes: cfg.max_document_bytes,
        })
    }

    /// Extracts plain text from `doc`.
    pub fn load(&self, doc: &Document) -> Result<String, LoaderError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "loader.load",
            format = %doc.format,
            raw_len = doc.len()
        );
        let _guard = span.enter();

        match self.load_inner(doc) {
            Ok(text) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(extracted_len = text.len(), elapsed_micros, "load_success");
                Ok(text)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "load_failure");
                Err(err)
            }
        }
    }

    fn load_inner(&self, doc: &Document) -> Result<String, LoaderError> {
        if let Some(limit) = self.max_document_bytes {
            if doc.len() > limit {
                return Err(LoaderError::DocumentTooLarge {
                    size: doc.len(),
                    limit,
                });
            }
        }

        match doc.format {
            DocumentFormat::Xml => Ok(self.xml.extract(&doc.content)),
            DocumentFormat::Pdf => pdf::extract_text(&doc.content),
        }
    }
}

/// One-shot convenience wrapper: compiles `cfg` and loads `doc`.
pub fn load_text(doc: &Document, cfg: &LoaderConfig) -> Result<String, LoaderError> {
    DocumentLoader::new(cfg)?.load(doc)
}
