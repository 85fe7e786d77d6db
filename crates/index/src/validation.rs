//! Reference-embeddings validation.
//!
//! Takes the first and last data rows of a reference file, rounds their
//! stored vectors to three decimals so the query is not bit-identical, and
//! asks the lookup for the nearest neighbor. Each row must find itself,
//! closer than the threshold.
use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn, Level};

use crate::error::IndexError;
use crate::knn::{KnnLookup, Neighbor};
use crate::reference::{read_first_row, read_last_row, ReferenceRow, RowLayout};

/// Decimal places kept in query vectors.
pub const QUERY_DECIMALS: u32 = 3;

/// Default maximum distance for a row to count as found.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 1e-2;

/// Which row of the file was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPosition {
    First,
    Last,
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowPosition::First => f.write_str("first"),
            RowPosition::Last => f.write_str("last"),
        }
    }
}

/// A confirmed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCheck {
    pub position: RowPosition,
    pub id: String,
    pub closest: Neighbor,
}

/// Outcome of a successful validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<RowCheck>,
}

/// Checks one raw data row against `lookup`.
pub fn check_row<L: KnnLookup + ?Sized>(
    line: &str,
    position: RowPosition,
    lookup: &L,
    layout: &RowLayout,
    threshold: f64,
) -> Result<RowCheck, IndexError> {
    let row = ReferenceRow::parse(line, layout)
        .map_err(|e| e.at(format!("{position} row")))?
        .rounded(QUERY_DECIMALS);

    let closest = lookup
        .nearest(&row.vector.view(), 1)?
        .into_iter()
        .next()
        .ok_or_else(|| IndexError::ValidationFailed {
            id: row.id.clone(),
            reason: "lookup returned no neighbors".into(),
        })?;

    info!(
        id = %closest.id,
        distance = closest.distance,
        "Closest {}; distance: {}",
        closest.id,
        closest.distance
    );

    if closest.id != row.id {
        return Err(IndexError::ValidationFailed {
            id: row.id,
            reason: format!("closest match is `{}`", closest.id),
        });
    }
    if closest.distance >= threshold {
        return Err(IndexError::ValidationFailed {
            id: row.id,
            reason: format!(
                "distance {} is not below {threshold}",
                closest.distance
            ),
        });
    }

    info!(id = %row.id, "{}: confirmed", row.id);
    Ok(RowCheck {
        position,
        id: row.id,
        closest,
    })
}

/// Validates the first and last data rows of the file at `path`.
pub fn validate_reference_file<L: KnnLookup + ?Sized>(
    path: impl AsRef<Path>,
    lookup: &L,
    layout: &RowLayout,
    threshold: f64,
) -> Result<ValidationReport, IndexError> {
    let path = path.as_ref();
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "index.validate", path = %path.display());
    let _guard = span.enter();

    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(IndexError::InvalidConfig(format!(
            "distance threshold must be positive, got {threshold}"
        )));
    }
    layout.validate()?;

    let result = [
        (RowPosition::First, read_first_row(path)),
        (RowPosition::Last, read_last_row(path)),
    ]
    .into_iter()
    .map(|(position, line)| check_row(&line?, position, lookup, layout, threshold))
    .collect::<Result<Vec<_>, _>>();

    match result {
        Ok(checks) => {
            info!(
                rows = checks.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "validate_success"
            );
            Ok(ValidationReport { checks })
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "validate_failure"
            );
            Err(err)
        }
    }
}
