//! Error taxonomy of the import pipeline.
//!
//! [`RowError`]s are row-scoped and never abort a batch. [`ImportError`] is
//! reserved for failures that end the whole import: an unreadable stream or a
//! rejected bulk create.

use thiserror::Error;

use crate::columns::Field;
use crate::store::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Row {row}: Missing {field} (expected a value in one of: {accepted})")]
    MissingField {
        row: usize,
        field: Field,
        accepted: String,
    },
    #[error("Row {row}: Failed to update \"{title}\": {reason}")]
    UpdateFailed {
        row: usize,
        title: String,
        reason: String,
    },
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingField { row, .. } | RowError::UpdateFailed { row, .. } => *row,
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Reading CSV header row")]
    Headers(#[source] csv::Error),
    #[error("Reading CSV row {row}")]
    Stream {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Decoding CSV row {row} as {encoding}")]
    Decode { row: usize, encoding: &'static str },
    #[error("Looking up existing podcasts")]
    Lookup(#[source] StoreError),
    #[error("Creating {count} podcast(s)")]
    BulkCreate {
        count: usize,
        #[source]
        source: StoreError,
    },
}
