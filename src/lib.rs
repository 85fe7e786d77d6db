//! Workspace umbrella crate for papervec.
//!
//! Stitches the loader, lexicon and semantic stages into one [`Pipeline`]:
//! raw document bytes go in, a `(1, dim)` mean-of-word-vectors embedding
//! comes out. Nearest-neighbor search is left to a [`KnnLookup`]
//! implementation supplied by the caller.
//!
//! ```no_run
//! use papervec::{Document, Pipeline, PipelineConfig};
//!
//! let cfg = PipelineConfig::from_file("papervec.yaml")?;
//! let pipeline = Pipeline::from_config(&cfg)?;
//!
//! let xml = std::fs::read("PMC1234567.nxml")?;
//! let embedding = pipeline.embed(&Document::xml(xml))?;
//! println!("{:?}", embedding.vector.shape());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
#[cfg(feature = "cli")]
pub mod telemetry;

pub use crate::config::{ConfigLoadError, PipelineConfig, ValidationYamlConfig};
pub use index::{
    check_row, read_first_row, read_last_row, validate_reference_file, ExactKnn, IndexError,
    KnnLookup, Neighbor, ReferenceRow, RowCheck, RowLayout, RowPosition, ValidationReport,
    DEFAULT_DISTANCE_THRESHOLD, QUERY_DECIMALS,
};
pub use lexicon::{Lexicon, LexiconConfig, LexiconError, StopWords};
pub use loader::{Document, DocumentFormat, DocumentLoader, LoaderConfig, LoaderError};
pub use semantic::{
    DocumentEmbedding, SemanticConfig, SemanticError, VectorFormat, VectorizeError, Vectorizer,
    WordVectors,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn, Level};

/// How a caller should treat a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input carries nothing usable. Report back, don't retry.
    UserInput,
    /// Broken document, resource or configuration.
    Fatal,
}

/// Errors that can occur while running a document through the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("document load failed: {0}")]
    Load(#[from] LoaderError),

    #[error(transparent)]
    Vectorize(#[from] VectorizeError),

    #[error("word vectors unavailable: {0}")]
    Semantic(#[from] SemanticError),

    #[error("lexical resources unavailable: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("nearest-neighbor lookup failed: {0}")]
    Index(#[from] IndexError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Vectorize(VectorizeError::NoValidTokens) => ErrorKind::UserInput,
            _ => ErrorKind::Fatal,
        }
    }

    /// HTTP status equivalent: 400 for user input, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::UserInput => 400,
            ErrorKind::Fatal => 500,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.kind() == ErrorKind::UserInput
    }
}

/// Document-to-vector pipeline.
///
/// Holds a compiled loader and a vectorizer whose model and lexicon sit
/// behind `Arc`s; clone freely across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: DocumentLoader,
    vectorizer: Vectorizer,
}

impl Pipeline {
    pub fn new(loader: DocumentLoader, vectorizer: Vectorizer) -> Self {
        Self { loader, vectorizer }
    }

    /// Builds every stage from `cfg`, loading the word vectors and lexical
    /// resources from disk.
    pub fn from_config(cfg: &PipelineConfig) -> Result<Self, PipelineError> {
        let start = Instant::now();
        cfg.validate()?;
        let loader = DocumentLoader::new(&cfg.loader)?;
        let vectorizer = Vectorizer::from_config(&cfg.semantic, &cfg.lexicon)?;
        info!(
            dim = vectorizer.dim(),
            vocab_len = vectorizer.word_vectors().len(),
            elapsed_micros = start.elapsed().as_micros(),
            "pipeline_ready"
        );
        Ok(Self::new(loader, vectorizer))
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    /// Output dimension.
    pub fn dim(&self) -> usize {
        self.vectorizer.dim()
    }

    /// Runs only the loader stage.
    pub fn extract_text(&self, doc: &Document) -> Result<String, PipelineError> {
        Ok(self.loader.load(doc)?)
    }

    /// Embeds already-extracted plain text.
    pub fn embed_text(&self, text: &str) -> Result<DocumentEmbedding, PipelineError> {
        Ok(self.vectorizer.vectorize(text)?)
    }

    /// Loads, analyzes and averages `doc` into a `(1, dim)` embedding.
    pub fn embed(&self, doc: &Document) -> Result<DocumentEmbedding, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "pipeline.embed",
            format = %doc.format,
            bytes = doc.len()
        );
        let _guard = span.enter();

        let result = self
            .extract_text(doc)
            .and_then(|text| self.embed_text(&text));

        match &result {
            Ok(embedding) => info!(
                token_count = embedding.token_count,
                dim = embedding.dim(),
                elapsed_micros = start.elapsed().as_micros(),
                "embed_success"
            ),
            Err(err) => warn!(
                error = %err,
                kind = ?err.kind(),
                elapsed_micros = start.elapsed().as_micros(),
                "embed_failure"
            ),
        }
        result
    }

    /// Reads and embeds a file. `format` defaults to the file extension.
    pub fn embed_file(
        &self,
        path: impl AsRef<Path>,
        format: Option<DocumentFormat>,
    ) -> Result<DocumentEmbedding, PipelineError> {
        let path = path.as_ref();
        let format = match format.or_else(|| DocumentFormat::from_path(path)) {
            Some(format) => format,
            None => {
                return Err(LoaderError::UnknownFormat(path.display().to_string()).into());
            }
        };
        let content = fs::read(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.embed(&Document::new(content, format))
    }

    /// Embeds `doc` and asks `lookup` for its `k` nearest papers.
    pub fn nearest<L: KnnLookup + ?Sized>(
        &self,
        doc: &Document,
        lookup: &L,
        k: usize,
    ) -> Result<Vec<Neighbor>, PipelineError> {
        let embedding = self.embed(doc)?;
        Ok(lookup.nearest(&embedding.vector.view(), k)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pipeline() -> Pipeline {
        let vectors = WordVectors::from_entries(
            2,
            vec![
                ("protein", vec![1.0, 0.0]),
                ("fold", vec![0.0, 1.0]),
                ("membrane", vec![-1.0, -1.0]),
            ],
        )
        .unwrap();
        let vectorizer = Vectorizer::new(Arc::new(vectors), Arc::new(Lexicon::default()));
        let loader = DocumentLoader::new(&LoaderConfig::default()).unwrap();
        Pipeline::new(loader, vectorizer)
    }

    fn jats(body: &str) -> Document {
        Document::xml(format!(
            "<article><front><abstract><p>{body}</p></abstract></front></article>"
        ))
    }

    #[test]
    fn embed_runs_all_stages() {
        let embedding = pipeline().embed(&jats("Proteins fold.")).unwrap();
        assert_eq!(embedding.vector.shape(), &[1, 2]);
        assert_eq!(embedding.to_vec(), vec![0.5, 0.5]);
    }

    #[test]
    fn no_valid_tokens_is_user_input() {
        let err = pipeline().embed(&jats("of the and")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UserInput);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Valid tokens not found in user input");
    }

    #[test]
    fn broken_pdf_is_fatal() {
        let err = pipeline()
            .embed(&Document::pdf(b"%PDF-1.5 not really".to_vec()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoaderError::Pdf(_))));
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn nearest_uses_lookup() {
        let mut knn = ExactKnn::new(2);
        knn.insert("PMC1", ndarray::array![0.5, 0.5].view()).unwrap();
        knn.insert("PMC2", ndarray::array![-1.0, -1.0].view()).unwrap();

        let hits = pipeline()
            .nearest(&jats("membranes"), &knn, 2)
            .unwrap();
        assert_eq!(hits[0].id, "PMC2");
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn embed_file_infers_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.nxml");
        fs::write(
            &path,
            "<article><body><sec><p>protein</p></sec></body></article>",
        )
        .unwrap();
        let embedding = pipeline().embed_file(&path, None).unwrap();
        assert_eq!(embedding.to_vec(), vec![1.0, 0.0]);

        let unknown = dir.path().join("paper.docx");
        assert!(matches!(
            pipeline().embed_file(&unknown, None),
            Err(PipelineError::Load(LoaderError::UnknownFormat(_)))
        ));
        assert!(matches!(
            pipeline().embed_file(dir.path().join("missing.xml"), None),
            Err(PipelineError::Io { .. })
        ));
    }

    #[test]
    fn pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
