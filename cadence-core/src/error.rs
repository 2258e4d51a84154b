//! Error types for the cadence ecosystem.

use chrono::NaiveDate;
use thiserror::Error;

use crate::series::SeriesId;

/// Errors that can occur in cadence operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed cadence/end-date combination on a definition.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// A mutation targeted a date the series can never produce.
    #[error("Series {series_id} has no occurrence on {date}")]
    OccurrenceNotFound {
        series_id: SeriesId,
        date: NaiveDate,
    },

    #[error("Series not found: {0}")]
    SeriesNotFound(SeriesId),

    /// A series with this id is already stored; ids are never reused.
    #[error("Series already exists: {0}")]
    SeriesExists(SeriesId),

    /// A persisted row could not be decoded back into a model type.
    #[error("Malformed row in '{table}': {reason}")]
    Row { table: &'static str, reason: String },

    /// The underlying record store failed; propagated unchanged, no retry.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by a [`RecordStore`](crate::store::RecordStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Opaque backend failure (network, backend rejection, ...).
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for cadence operations.
pub type Result<T> = std::result::Result<T, Error>;
