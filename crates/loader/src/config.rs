//! Configuration types for document loading.
//!
//! [`LoaderConfig`] controls which XML elements are discarded, which are made
//! transparent, and which elements contribute text. The defaults target the
//! JATS schema used by bioRxiv and PubMed Central full text.
//!
//! # Quick Start
//!
//! ```rust
//! use loader::LoaderConfig;
//!
//! let config = LoaderConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.strip_tags.len(), 17);
//! ```
//!
//! # Alternate schemas
//!
//! ```rust
//! use loader::LoaderConfig;
//!
//! let config = LoaderConfig {
//!     strip_tags: vec!["table".into(), "figure".into()],
//!     path_query: "//article/section//para".into(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
use serde::{Deserialize, Serialize};

use crate::error::LoaderError;
use crate::query::PathQuery;

/// Markup elements whose content never reaches the extracted text.
///
/// These carry formatting, cross-references, tables, figures and formulas.
/// Their text is noise for a bag-of-lemmas model and their boundaries split
/// words apart.
pub const DEFAULT_STRIP_TAGS: &[&str] = &[
    "sc",
    "italic",
    "xref",
    "label",
    "sub",
    "sup",
    "inline-formula",
    "fig",
    "disp-formula",
    "bold",
    "table-wrap",
    "table",
    "thead",
    "tbody",
    "caption",
    "tr",
    "td",
];

/// Abstract and body paragraphs/titles of a JATS article.
pub const DEFAULT_PATH_QUERY: &str =
    "//abstract/p|//abstract/title|//body/sec//p|//body/sec//title";

/// Runtime configuration for the document loader.
///
/// # Fields
///
/// - `strip_tags`: elements removed together with everything inside them
/// - `unwrap_tags`: elements removed while their text stays inline
/// - `path_query`: XPath-subset selecting the elements that contribute text
/// - `max_document_bytes`: optional raw size limit
///
/// # Serialization
///
/// ```json
/// {
///   "strip_tags": ["xref", "table"],
///   "unwrap_tags": ["italic"],
///   "path_query": "//abstract/p|//body/sec//p",
///   "max_document_bytes": 52428800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Elements dropped with their entire content. Matched by local name.
    pub strip_tags: Vec<String>,

    /// Elements whose tags are dropped but whose text is kept in place.
    ///
    /// An unwrapped element is also invisible to the path query, so
    /// `<abstract><bold><p>..</p></bold></abstract>` still matches
    /// `//abstract/p` when `bold` is unwrapped.
    pub unwrap_tags: Vec<String>,

    /// Selection query over element local names.
    ///
    /// Supports `|` unions, `/` child and `//` descendant steps and `*`
    /// wildcards. Every alternative must start at the document root (`/` or
    /// `//`).
    pub path_query: String,

    /// Maximum accepted size of the raw document. `None` disables the check.
    pub max_document_bytes: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strip_tags: DEFAULT_STRIP_TAGS.iter().map(|t| t.to_string()).collect(),
            unwrap_tags: Vec::new(),
            path_query: DEFAULT_PATH_QUERY.to_string(),
            max_document_bytes: None,
        }
    }
}

impl LoaderConfig {
    /// Checks the configuration for internal consistency.
    ///
    /// Rejects an unparsable path query, blank tag names, a tag listed as both
    /// stripped and unwrapped, and a zero size limit.
    pub fn validate(&self) -> Result<(), LoaderError> {
        self.path_query.parse::<PathQuery>()?;

        for tag in self.strip_tags.iter().chain(self.unwrap_tags.iter()) {
            if tag.trim().is_empty() {
                return Err(LoaderError::InvalidConfig(
                    "tag names must not be blank".into(),
                ));
            }
        }

        if let Some(tag) = self
            .unwrap_tags
            .iter()
            .find(|tag| self.strip_tags.contains(tag))
        {
            return Err(LoaderError::InvalidConfig(format!(
                "tag `{tag}` is listed in both strip_tags and unwrap_tags"
            )));
        }

        if self.max_document_bytes == Some(0) {
            return Err(LoaderError::InvalidConfig(
                "max_document_bytes must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
