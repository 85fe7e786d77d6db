//! Reference embeddings files.
//!
//! A reference file is tab-separated with a header line. Each data row holds
//! the paper id in one column and the stored embedding in the last
//! `dimension` columns; anything in between (journal, title, ...) is ignored.
//!
//! ```text
//! pmcid   journal   d0      d1     ...  d299
//! PMC123  Nature    0.0132  -0.21  ...  0.044
//! ```
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

const SEEK_BLOCK: u64 = 4096;

/// Column layout of a reference file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    /// Zero-based column holding the paper id.
    pub id_column: usize,
    /// Number of trailing columns that form the vector.
    pub dimension: usize,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            id_column: 0,
            dimension: 300,
        }
    }
}

impl RowLayout {
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.dimension == 0 {
            return Err(IndexError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub id: String,
    /// Stored vector shaped `(1, dimension)`, ready to use as a query.
    pub vector: Array2<f64>,
}

impl ReferenceRow {
    /// Parses a tab-separated data row.
    ///
    /// Surrounding whitespace is trimmed first. The id column must lie before
    /// the vector columns.
    pub fn parse(line: &str, layout: &RowLayout) -> Result<Self, IndexError> {
        layout.validate()?;
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let needed = layout.dimension + 1;
        if fields.len() < needed {
            return Err(IndexError::malformed(
                "row",
                format!(
                    "expected at least {needed} tab-separated fields, found {}",
                    fields.len()
                ),
            ));
        }

        let vector_start = fields.len() - layout.dimension;
        if layout.id_column >= vector_start {
            return Err(IndexError::malformed(
                "row",
                format!(
                    "id column {} overlaps the vector columns starting at {vector_start}",
                    layout.id_column
                ),
            ));
        }

        let id = fields[layout.id_column].trim();
        if id.is_empty() {
            return Err(IndexError::malformed("row", "empty id"));
        }

        let values = fields[vector_start..]
            .iter()
            .map(|f| {
                f.trim()
                    .parse::<f64>()
                    .map_err(|e| IndexError::malformed("row", format!("`{f}`: {e}")))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let vector = Array2::from_shape_vec((1, layout.dimension), values)
            .map_err(|e| IndexError::malformed("row", e.to_string()))?;
        Ok(Self {
            id: id.to_string(),
            vector,
        })
    }

    /// Rounds every component to `decimals` places, half away from zero.
    pub fn rounded(mut self, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        self.vector.mapv_inplace(|v| (v * scale).round() / scale);
        self
    }
}

/// Reads the first data row, the line right after the header.
pub fn read_first_row(path: impl AsRef<Path>) -> Result<String, IndexError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|e| IndexError::io(path, e))?;
    let mut row = String::new();
    reader
        .read_line(&mut row)
        .map_err(|e| IndexError::io(path, e))?;

    let row = row.trim_end_matches(['\r', '\n']);
    if row.trim().is_empty() {
        return Err(IndexError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(row.to_string())
}

/// Reads the last data row by seeking backward from the end of the file.
///
/// Trailing line breaks are ignored. A file whose only line is the header
/// has no last row.
pub fn read_last_row(path: impl AsRef<Path>) -> Result<String, IndexError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| IndexError::io(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| IndexError::io(path, e))?
        .len();

    let mut tail: Vec<u8> = Vec::new();
    let mut pos = len;
    while pos > 0 {
        let step = SEEK_BLOCK.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))
            .map_err(|e| IndexError::io(path, e))?;
        let mut block = vec![0u8; step as usize];
        file.read_exact(&mut block)
            .map_err(|e| IndexError::io(path, e))?;
        block.extend_from_slice(&tail);
        tail = block;

        let end = tail
            .iter()
            .rposition(|&b| b != b'\n' && b != b'\r')
            .map_or(0, |i| i + 1);
        if let Some(newline) = tail[..end].iter().rposition(|&b| b == b'\n') {
            let line = std::str::from_utf8(&tail[newline + 1..end])
                .map_err(|e| IndexError::malformed("last row", e.to_string()))?;
            return Ok(line.to_string());
        }
    }

    Err(IndexError::EmptyFile {
        path: path.to_path_buf(),
    })
}
