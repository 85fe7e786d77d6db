//! The word embedding model.
//!
//! [`WordVectors`] holds a vocabulary (`word -> row`) and a dense
//! `(vocab_len, dim)` `f32` matrix. Both word2vec layouts are readable:
//!
//! | Layout | Header | Entry |
//! |--------|--------|-------|
//! | text | `"<count> <dim>\n"` | `word v1 .. vdim\n` |
//! | binary | `"<count> <dim>\n"` | `word ` then `dim` little-endian `f32`s |
//!
//! The model is read-only after load.
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;

use fxhash::FxHashMap;
use lexicon::Vocabulary;
use ndarray::{Array2, ArrayView1};
use tracing::info;

use crate::config::VectorFormat;
use crate::error::SemanticError;

/// Largest vector size a model header may declare.
const MAX_DIMENSION: usize = 1 << 16;

/// Entries reserved up front; the header count is not trusted beyond this.
const PREALLOC_ENTRIES: usize = 1 << 20;

/// Read-only word embedding table.
#[derive(Debug, Clone)]
pub struct WordVectors {
    index: FxHashMap<String, usize>,
    matrix: Array2<f32>,
}

impl WordVectors {
    /// Builds a model from in-memory `(word, vector)` pairs.
    ///
    /// Every vector must have exactly `dim` components and words must be
    /// unique.
    pub fn from_entries<I, S>(dim: usize, entries: I) -> Result<Self, SemanticError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        if dim == 0 {
            return Err(SemanticError::InvalidConfig(
                "vector dimension must be greater than zero".into(),
            ));
        }

        let mut index = FxHashMap::default();
        let mut data = Vec::new();
        for (word, vector) in entries {
            let word = word.into();
            if vector.len() != dim {
                return Err(SemanticError::Dimension {
                    word,
                    expected: dim,
                    actual: vector.len(),
                });
            }
            let row = index.len();
            if index.insert(word.clone(), row).is_some() {
                return Err(SemanticError::Format {
                    location: format!("entry {}", row + 1),
                    message: format!("duplicate word `{word}`"),
                });
            }
            data.extend(vector);
        }

        let rows = index.len();
        let matrix = Array2::from_shape_vec((rows, dim), data).map_err(|e| {
            SemanticError::Format {
                location: "matrix".into(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { index, matrix })
    }

    /// Reads a word2vec file. `format` may be [`VectorFormat::Auto`].
    pub fn load(path: impl AsRef<Path>, format: VectorFormat) -> Result<Self, SemanticError> {
        let path = path.as_ref();
        let start = Instant::now();
        let format = format.resolve(path);
        let file = File::open(path).map_err(|source| SemanticError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let vectors = match format {
            VectorFormat::Binary => Self::read_binary(reader),
            _ => Self::read_text(reader),
        }
        .map_err(|err| match err {
            SemanticError::Io { source, .. } => SemanticError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        info!(
            path = %path.display(),
            format = %format,
            vocab_len = vectors.len(),
            dim = vectors.dim(),
            elapsed_micros = start.elapsed().as_micros(),
            "word_vectors_loaded"
        );
        Ok(vectors)
    }

    /// Parses word2vec text format.
    pub fn read_text<R: BufRead>(reader: R) -> Result<Self, SemanticError> {
        let mut lines = reader.lines().enumerate();

        let (count, dim) = match lines.next() {
            Some((_, line)) => parse_header(&line.map_err(io_error)?)?,
            None => return Err(format_error("header", "file is empty")),
        };

        let mut entries = Vec::with_capacity(count.min(PREALLOC_ENTRIES));
        for (line_no, line) in lines {
            let line = line.map_err(io_error)?;
            if line.trim().is_empty() {
                continue;
            }
            if entries.len() == count {
                return Err(format_error(
                    format!("line {}", line_no + 1),
                    format!("more than the {count} vectors declared in the header"),
                ));
            }

            let mut fields = line.split_whitespace();
            let word = fields.next().unwrap_or_default().to_string();
            let vector = fields
                .map(|f| {
                    f.parse::<f32>().map_err(|e| {
                        format_error(format!("line {}", line_no + 1), format!("`{f}`: {e}"))
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;
            entries.push((word, vector));
        }

        if entries.len() != count {
            return Err(format_error(
                "end of file",
                format!("expected {count} vectors, found {}", entries.len()),
            ));
        }
        Self::from_entries(dim, entries)
    }

    /// Parses word2vec binary format.
    pub fn read_binary<R: BufRead>(mut reader: R) -> Result<Self, SemanticError> {
        let mut header = String::new();
        reader.read_line(&mut header).map_err(io_error)?;
        if header.trim().is_empty() {
            return Err(format_error("header", "file is empty"));
        }
        let (count, dim) = parse_header(&header)?;

        let row_bytes = dim
            .checked_mul(4)
            .ok_or_else(|| format_error("header", format!("dimension {dim} is too large")))?;
        let mut entries = Vec::with_capacity(count.min(PREALLOC_ENTRIES));
        let mut word_buf = Vec::new();
        let mut vec_buf = vec![0u8; row_bytes];
        for entry in 0..count {
            word_buf.clear();
            reader.read_until(b' ', &mut word_buf).map_err(io_error)?;
            if word_buf.last() != Some(&b' ') {
                return Err(format_error(
                    format!("entry {}", entry + 1),
                    format!("expected {count} vectors, found {entry}"),
                ));
            }
            word_buf.pop();
            let word = String::from_utf8_lossy(&word_buf)
                .trim_start_matches('\n')
                .to_string();

            reader.read_exact(&mut vec_buf).map_err(|e| {
                format_error(format!("entry {}", entry + 1), format!("`{word}`: {e}"))
            })?;
            let vector = vec_buf
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            entries.push((word, vector));
        }

        Self::from_entries(dim, entries)
    }

    /// Embedding row for `word`, if known.
    pub fn get(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.index.get(word).map(|&row| self.matrix.row(row))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Fixed vector size of the model.
    pub fn dim(&self) -> usize {
        self.matrix.ncols()
    }

    /// Vocabulary size.
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vocabulary for WordVectors {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }
}

fn parse_header(line: &str) -> Result<(usize, usize), SemanticError> {
    let mut parts = line.split_whitespace();
    let parse = |field: Option<&str>, name: &str| -> Result<usize, SemanticError> {
        field
            .ok_or_else(|| format_error("header", format!("missing {name}")))?
            .parse::<usize>()
            .map_err(|e| format_error("header", format!("{name}: {e}")))
    };
    let count = parse(parts.next(), "vector count")?;
    let dim = parse(parts.next(), "dimension")?;
    if dim == 0 {
        return Err(format_error("header", "dimension must be greater than zero"));
    }
    if dim > MAX_DIMENSION {
        return Err(format_error(
            "header",
            format!("dimension {dim} exceeds the supported maximum of {MAX_DIMENSION}"),
        ));
    }
    Ok((count, dim))
}

fn format_error(location: impl Into<String>, message: impl Into<String>) -> SemanticError {
    SemanticError::Format {
        location: location.into(),
        message: message.into(),
    }
}

fn io_error(source: std::io::Error) -> SemanticError {
    SemanticError::Io {
        path: Default::default(),
        source,
    }
}
