//! papervec semantic vectors
//!
//! This crate turns plain text into a single dense vector by averaging word
//! embeddings. No neural inference runs here: a pre-trained word2vec table is
//! loaded once and every document is the arithmetic mean of the vectors of
//! its lemmas.
//!
//! The flow per document:
//!
//! 1. [`lexicon::Lexicon::analyze`] tokenizes and lemmatizes the text, gating
//!    lemma candidates on the model vocabulary.
//! 2. Lemmas missing from the model, and stop words, are dropped.
//! 3. Surviving vectors are summed in `f64` and divided by their count.
//!    Duplicates count once per occurrence.
//! 4. The result comes back shaped `(1, dim)`.
//!
//! When step 2 leaves nothing, [`VectorizeError::NoValidTokens`] is returned.
//! That is a client error, not a fault in the model.
//!
//! ## Threading notes
//!
//! [`WordVectors`] and the lexicon are immutable after load. A
//! [`Vectorizer`] holds both behind `Arc`s, so cloning it per worker is
//! cheap and no locking happens on the hot path.
//!
//! ## Quick example
//!
//! ```
//! use std::sync::Arc;
//! use lexicon::Lexicon;
//! use semantic::{Vectorizer, WordVectors};
//!
//! let vectors = WordVectors::from_entries(
//!     2,
//!     vec![("protein", vec![1.0, 0.0]), ("fold", vec![0.0, 1.0])],
//! )
//! .unwrap();
//! let vectorizer = Vectorizer::new(Arc::new(vectors), Arc::new(Lexicon::default()));
//!
//! let embedding = vectorizer.vectorize("The protein folds.").unwrap();
//! assert_eq!(embedding.vector.shape(), &[1, 2]);
//! assert_eq!(embedding.to_vec(), vec![0.5, 0.5]);
//! ```

pub mod config;
pub mod error;
pub mod types;

mod vectorizer;
mod vectors;

pub use crate::config::{SemanticConfig, VectorFormat};
pub use crate::error::{SemanticError, VectorizeError};
pub use crate::types::DocumentEmbedding;
pub use crate::vectorizer::Vectorizer;
pub use crate::vectors::WordVectors;

/// Vectorizes several texts with one shared [`Vectorizer`].
///
/// Results line up with the input; one failing text does not stop the rest.
pub fn vectorize_batch<T: AsRef<str>>(
    vectorizer: &Vectorizer,
    texts: &[T],
) -> Vec<Result<DocumentEmbedding, VectorizeError>> {
    texts
        .iter()
        .map(|text| vectorizer.vectorize(text.as_ref()))
        .collect()
}
