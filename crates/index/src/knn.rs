//! Nearest-neighbor lookup.
//!
//! [`KnnLookup`] is the seam to whatever search service holds the paper
//! corpus. [`ExactKnn`] is a linear scan with Euclidean distance; it exists
//! to validate embedding files and to serve small corpora from the CLI.
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IndexError;
use crate::reference::{ReferenceRow, RowLayout};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Identifier of the stored paper.
    pub id: String,
    /// Distance to the query; smaller is closer.
    pub distance: f64,
}

/// Looks up the stored vectors closest to a query.
pub trait KnnLookup: Send + Sync {
    /// Returns up to `k` neighbors of a `(1, dim)` query, nearest first.
    fn nearest(&self, query: &ArrayView2<'_, f64>, k: usize) -> Result<Vec<Neighbor>, IndexError>;
}

impl<L: KnnLookup + ?Sized> KnnLookup for Box<L> {
    fn nearest(&self, query: &ArrayView2<'_, f64>, k: usize) -> Result<Vec<Neighbor>, IndexError> {
        (**self).nearest(query, k)
    }
}

/// Brute-force Euclidean lookup over an in-memory table.
#[derive(Debug, Clone)]
pub struct ExactKnn {
    dim: usize,
    ids: Vec<String>,
    data: Vec<f64>,
}

impl ExactKnn {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ids: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Appends a vector. Ids are not deduplicated.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        vector: ArrayView1<'_, f64>,
    ) -> Result<(), IndexError> {
        let id = id.into();
        if vector.len() != self.dim {
            return Err(IndexError::Dimension {
                id,
                expected: self.dim,
                actual: vector.len(),
            });
        }
        self.ids.push(id);
        self.data.extend(vector.iter().copied());
        Ok(())
    }

    /// Loads every data row of a reference embeddings file, header skipped.
    pub fn from_reference_file(
        path: impl AsRef<Path>,
        layout: &RowLayout,
    ) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let start = Instant::now();
        layout.validate()?;

        let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
        let mut knn = Self::new(layout.dimension);
        for (line_no, line) in BufReader::new(file).lines().enumerate().skip(1) {
            let line = line.map_err(|e| IndexError::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let row = ReferenceRow::parse(&line, layout)
                .map_err(|e| e.at(format!("{}:{}", path.display(), line_no + 1)))?;
            knn.insert(row.id, row.vector.row(0))?;
        }

        if knn.is_empty() {
            return Err(IndexError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        info!(
            path = %path.display(),
            rows = knn.len(),
            dim = knn.dim(),
            elapsed_micros = start.elapsed().as_micros(),
            "reference_loaded"
        );
        Ok(knn)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.data.chunks_exact(self.dim.max(1)))
    }
}

fn euclidean(a: ArrayView1<'_, f64>, b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

impl KnnLookup for ExactKnn {
    fn nearest(&self, query: &ArrayView2<'_, f64>, k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let (rows, cols) = query.dim();
        if rows != 1 || cols != self.dim {
            return Err(IndexError::QueryShape {
                rows,
                cols,
                expected: self.dim,
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let q = query.row(0);
        let mut results: Vec<Neighbor> = self
            .rows()
            .map(|(id, vector)| Neighbor {
                id: id.to_string(),
                distance: euclidean(q, vector),
            })
            .collect();

        // Ties fall back to id order so results are deterministic.
        results.sort_unstable_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use std::io::Write;

    fn seeded() -> ExactKnn {
        let mut knn = ExactKnn::new(2);
        knn.insert("PMC1", array![0.0, 0.0].view()).unwrap();
        knn.insert("PMC2", array![3.0, 4.0].view()).unwrap();
        knn.insert("PMC3", array![1.0, 0.0].view()).unwrap();
        knn
    }

    #[test]
    fn nearest_orders_by_distance() {
        let knn = seeded();
        let query = array![[0.9, 0.1]];
        let hits = knn.nearest(&query.view(), 3).unwrap();
        let ids: Vec<&str> = hits.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["PMC3", "PMC1", "PMC2"]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn distance_is_euclidean() {
        let knn = seeded();
        let hits = knn.nearest(&array![[0.0, 0.0]].view(), 3).unwrap();
        assert_eq!(hits[0], Neighbor { id: "PMC1".into(), distance: 0.0 });
        assert_eq!(hits[2].distance, 5.0);
    }

    #[test]
    fn ties_break_on_id() {
        let mut knn = ExactKnn::new(1);
        knn.insert("b", array![1.0].view()).unwrap();
        knn.insert("a", array![-1.0].view()).unwrap();
        let hits = knn.nearest(&array![[0.0]].view(), 2).unwrap();
        assert_eq!(hits[0].id, "a");
        assert_eq!(hits[1].id, "b");
    }

    #[test]
    fn k_limits_results() {
        let knn = seeded();
        assert_eq!(knn.nearest(&array![[0.0, 0.0]].view(), 1).unwrap().len(), 1);
        assert!(knn.nearest(&array![[0.0, 0.0]].view(), 0).unwrap().is_empty());
        assert_eq!(knn.nearest(&array![[0.0, 0.0]].view(), 10).unwrap().len(), 3);
    }

    #[test]
    fn rejects_wrong_query_shape() {
        let knn = seeded();
        let wide = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            knn.nearest(&wide.view(), 1),
            Err(IndexError::QueryShape { cols: 3, .. })
        ));
        let tall = Array2::<f64>::zeros((2, 2));
        assert!(knn.nearest(&tall.view(), 1).is_err());
    }

    #[test]
    fn insert_checks_dimension() {
        let mut knn = ExactKnn::new(2);
        let err = knn.insert("x", array![1.0].view()).unwrap_err();
        assert!(matches!(err, IndexError::Dimension { expected: 2, actual: 1, .. }));
        assert!(knn.is_empty());
    }

    #[test]
    fn loads_reference_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pmcid\tjournal\td0\td1").unwrap();
        writeln!(file, "PMC10\tNature\t0.5\t1.5").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "PMC11\tCell\t-2\t0").unwrap();

        let layout = RowLayout {
            id_column: 0,
            dimension: 2,
        };
        let knn = ExactKnn::from_reference_file(file.path(), &layout).unwrap();
        assert_eq!(knn.len(), 2);
        let hits = knn.nearest(&array![[0.5, 1.5]].view(), 1).unwrap();
        assert_eq!(hits[0].id, "PMC10");
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pmcid\td0").unwrap();
        let layout = RowLayout {
            id_column: 0,
            dimension: 1,
        };
        assert!(matches!(
            ExactKnn::from_reference_file(file.path(), &layout),
            Err(IndexError::EmptyFile { .. })
        ));
    }

    #[test]
    fn malformed_row_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pmcid\td0\nPMC1\t0.1\nPMC2\tnope").unwrap();
        let layout = RowLayout {
            id_column: 0,
            dimension: 1,
        };
        let err = ExactKnn::from_reference_file(file.path(), &layout).unwrap_err();
        assert!(err.to_string().contains(":3"), "{err}");
    }

    #[test]
    fn neighbor_serializes_as_object() {
        let n = Neighbor {
            id: "PMC7".into(),
            distance: 0.25,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["id"], "PMC7");
        assert_eq!(json["distance"], 0.25);
    }
}
