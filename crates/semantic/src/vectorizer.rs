use std::sync::Arc;
use std::time::Instant;

use lexicon::{Lexicon, LexiconConfig};
use ndarray::{Array1, Axis};
use tracing::{info, warn, Level};

use crate::config::SemanticConfig;
use crate::error::{SemanticError, VectorizeError};
use crate::types::DocumentEmbedding;
use crate::vectors::WordVectors;

/// Turns plain text into the mean of its known, non-stop-word lemma vectors.
///
/// Cheap to clone; resources sit behind `Arc`s.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vectors: Arc<WordVectors>,
    lexicon: Arc<Lexicon>,
}

impl Vectorizer {
    pub fn new(vectors: Arc<WordVectors>, lexicon: Arc<Lexicon>) -> Self {
        Self { vectors, lexicon }
    }

    /// Loads the model and the lexical resources named by the configs.
    pub fn from_config(
        semantic: &SemanticConfig,
        lexicon: &LexiconConfig,
    ) -> Result<Self, SemanticError> {
        semantic.validate()?;
        let vectors = WordVectors::load(&semantic.word_vectors_path, semantic.word_vectors_format)?;
        let lexicon = Lexicon::from_config(lexicon)?;
        Ok(Self::new(Arc::new(vectors), Arc::new(lexicon)))
    }

    pub fn word_vectors(&self) -> &WordVectors {
        &self.vectors
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Output dimension.
    pub fn dim(&self) -> usize {
        self.vectors.dim()
    }

    /// Lemmas that are in the vocabulary and not stop words, in text order.
    pub fn valid_lemmas(&self, text: &str) -> Vec<String> {
        self.lexicon
            .analyze(text, self.vectors.as_ref())
            .into_iter()
            .map(|t| t.lemma)
            .filter(|lemma| self.vectors.contains(lemma) && !self.lexicon.is_stop_word(lemma))
            .collect()
    }

    /// Averages the vectors of every valid lemma in `text`.
    ///
    /// Each occurrence counts, so repeated words weigh more. Fails with
    /// [`VectorizeError::NoValidTokens`] when nothing survives filtering.
    pub fn vectorize(&self, text: &str) -> Result<DocumentEmbedding, VectorizeError> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "semantic.vectorize", text_len = text.len());
        let _guard = span.enter();

        let lemmas = self.valid_lemmas(text);
        if lemmas.is_empty() {
            let err = VectorizeError::NoValidTokens;
            warn!(error = %err, elapsed_micros = start.elapsed().as_micros(), "vectorize_failure");
            return Err(err);
        }

        let mut sum = Array1::<f64>::zeros(self.vectors.dim());
        for lemma in &lemmas {
            if let Some(row) = self.vectors.get(lemma) {
                sum.zip_mut_with(&row, |acc, &v| *acc += f64::from(v));
            }
        }
        let token_count = lemmas.len();
        let mean = sum / token_count as f64;

        info!(
            token_count,
            dim = mean.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "vectorize_success"
        );

        Ok(DocumentEmbedding {
            vector: mean.insert_axis(Axis(0)),
            token_count,
        })
    }
}
