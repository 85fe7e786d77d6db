use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SemanticError;

/// On-disk layout of the word-vector file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VectorFormat {
    /// Pick by extension: `.bin` is binary, anything else text.
    #[default]
    Auto,
    /// word2vec text: header `"<count> <dim>"`, then `word v1 .. vdim` per line.
    Text,
    /// word2vec binary: text header, then `word<space>` and `dim` little-endian f32s.
    Binary,
}

impl VectorFormat {
    /// Resolves [`VectorFormat::Auto`] against `path`.
    pub fn resolve(self, path: &Path) -> VectorFormat {
        match self {
            VectorFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("bin") => VectorFormat::Binary,
                _ => VectorFormat::Text,
            },
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VectorFormat::Auto => "auto",
            VectorFormat::Text => "text",
            VectorFormat::Binary => "binary",
        }
    }
}

impl fmt::Display for VectorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorFormat {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(VectorFormat::Auto),
            "text" | "txt" => Ok(VectorFormat::Text),
            "binary" | "bin" => Ok(VectorFormat::Binary),
            other => Err(SemanticError::InvalidConfig(format!(
                "unknown word vector format `{other}`"
            ))),
        }
    }
}

/// Where the embedding model lives and how to read it.
///
/// # Example
/// ```
/// use semantic::{SemanticConfig, VectorFormat};
///
/// let cfg = SemanticConfig::default();
/// assert_eq!(cfg.word_vectors_format, VectorFormat::Auto);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Path to the word2vec file.
    pub word_vectors_path: PathBuf,
    /// File layout; `auto` decides by extension.
    pub word_vectors_format: VectorFormat,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            word_vectors_path: PathBuf::from("data/word_model.wv.txt"),
            word_vectors_format: VectorFormat::Auto,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.word_vectors_path.as_os_str().is_empty() {
            return Err(SemanticError::InvalidConfig(
                "word_vectors_path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The concrete format for the configured path.
    pub fn resolved_format(&self) -> VectorFormat {
        self.word_vectors_format.resolve(&self.word_vectors_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_format_follows_extension() {
        assert_eq!(
            VectorFormat::Auto.resolve(Path::new("model.BIN")),
            VectorFormat::Binary
        );
        assert_eq!(
            VectorFormat::Auto.resolve(Path::new("model.wv.txt")),
            VectorFormat::Text
        );
        assert_eq!(
            VectorFormat::Text.resolve(Path::new("model.bin")),
            VectorFormat::Text
        );
    }

    #[test]
    fn format_parses_aliases() {
        assert_eq!("bin".parse::<VectorFormat>().unwrap(), VectorFormat::Binary);
        assert_eq!(" Text ".parse::<VectorFormat>().unwrap(), VectorFormat::Text);
        assert!("glove".parse::<VectorFormat>().is_err());
    }

    #[test]
    fn empty_path_is_invalid() {
        let cfg = SemanticConfig {
            word_vectors_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[test]
    fn deserializes_lowercase_format() {
        let cfg: SemanticConfig = serde_json::from_str(
            r#"{ "word_vectors_path": "m.bin", "word_vectors_format": "binary" }"#,
        )
        .unwrap();
        assert_eq!(cfg.word_vectors_format, VectorFormat::Binary);
        assert_eq!(cfg.resolved_format(), VectorFormat::Binary);
    }
}
