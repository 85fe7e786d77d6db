//! YAML configuration file support for papervec.
//!
//! One file configures every stage. Each section is optional and falls back
//! to its defaults, so the smallest valid file is `version: "1.0"`.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "pmc-oa"
//!
//! loader:
//!   strip_tags: [sc, italic, sub, sup, underline, bold, xref, ext-link]
//!   unwrap_tags: []
//!   path_query: "//abstract/p|//abstract/title|//body/sec//p|//body/sec//title"
//!   max_document_bytes: 52428800
//!
//! lexicon:
//!   normalize_unicode: true
//!   lowercase: true
//!   stop_words_path: null
//!   lemma_lookup_path: data/lemmas.json
//!
//! semantic:
//!   word_vectors_path: data/word_model.wv.txt
//!   word_vectors_format: auto
//!
//! validation:
//!   id_column: 0
//!   dimension: 300
//!   distance_threshold: 0.01
//! ```

use std::fs;
use std::path::Path;

use index::{RowLayout, DEFAULT_DISTANCE_THRESHOLD};
use lexicon::LexiconConfig;
use loader::LoaderConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub lexicon: LexiconConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    /// Reference-embeddings harness settings
    #[serde(default)]
    pub validation: ValidationYamlConfig,
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.loader.path_query.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "loader.path_query must not be empty".to_string(),
            ));
        }
        self.loader
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("loader: {e}")))?;
        self.semantic
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("semantic: {e}")))?;
        self.validation.validate()?;

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            loader: LoaderConfig::default(),
            lexicon: LexiconConfig::default(),
            semantic: SemanticConfig::default(),
            validation: ValidationYamlConfig::default(),
        }
    }
}

/// Reference-embeddings harness YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationYamlConfig {
    /// Zero-based column holding the paper id.
    #[serde(default)]
    pub id_column: usize,

    /// Number of trailing columns that form the stored vector.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// A row is confirmed when its nearest neighbor is closer than this.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
}

impl ValidationYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.dimension == 0 {
            return Err(ConfigLoadError::Validation(
                "validation.dimension must be >= 1".to_string(),
            ));
        }
        if !self.distance_threshold.is_finite() || self.distance_threshold <= 0.0 {
            return Err(ConfigLoadError::Validation(
                "validation.distance_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Column layout for reference files.
    pub fn layout(&self) -> RowLayout {
        RowLayout {
            id_column: self.id_column,
            dimension: self.dimension,
        }
    }
}

impl Default for ValidationYamlConfig {
    fn default() -> Self {
        Self {
            id_column: 0,
            dimension: default_dimension(),
            distance_threshold: default_distance_threshold(),
        }
    }
}

fn default_dimension() -> usize {
    RowLayout::default().dimension
}
fn default_distance_threshold() -> f64 {
    DEFAULT_DISTANCE_THRESHOLD
}
