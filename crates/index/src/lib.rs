//! # papervec Index
//!
//! Nearest-neighbor plumbing for document embeddings. The production corpus
//! search lives in an external service; this crate defines the seam to it
//! and ships just enough to check that stored embeddings and the lookup
//! agree with each other.
//!
//! ## Core pieces
//!
//! - [`KnnLookup`]: `nearest(query, k)` over `(1, dim)` `f64` queries, nearest
//!   first.
//! - [`ExactKnn`]: linear-scan Euclidean implementation, loadable from a
//!   reference embeddings file.
//! - [`ReferenceRow`], [`read_first_row`], [`read_last_row`]: tab-separated
//!   reference file access.
//! - [`validate_reference_file`]: confirms the first and last rows of a file
//!   are their own nearest neighbors.
//!
//! ## Example Usage
//!
//! ```
//! use index::{ExactKnn, KnnLookup};
//! use ndarray::array;
//!
//! let mut knn = ExactKnn::new(2);
//! knn.insert("PMC1", array![0.0, 1.0].view()).unwrap();
//! knn.insert("PMC2", array![4.0, 4.0].view()).unwrap();
//!
//! let hits = knn.nearest(&array![[0.1, 0.9]].view(), 1).unwrap();
//! assert_eq!(hits[0].id, "PMC1");
//! ```

mod error;
mod knn;
mod reference;
mod validation;

pub use crate::error::IndexError;
pub use crate::knn::{ExactKnn, KnnLookup, Neighbor};
pub use crate::reference::{read_first_row, read_last_row, ReferenceRow, RowLayout};
pub use crate::validation::{
    check_row, validate_reference_file, RowCheck, RowPosition, ValidationReport,
    DEFAULT_DISTANCE_THRESHOLD, QUERY_DECIMALS,
};
