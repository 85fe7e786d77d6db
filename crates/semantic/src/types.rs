use ndarray::Array2;

/// Document vector produced by the [`Vectorizer`](crate::Vectorizer).
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEmbedding {
    /// Mean of the contributing word vectors, shaped `(1, dim)`.
    pub vector: Array2<f64>,
    /// Number of tokens that contributed, duplicates included.
    pub token_count: usize,
}

impl DocumentEmbedding {
    /// Length of the embedding.
    pub fn dim(&self) -> usize {
        self.vector.ncols()
    }

    /// The single row as a flat `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.vector.iter().copied().collect()
    }
}
