//! Occurrence identity, overrides, and the materialized occurrence shape.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::fields::{EventFields, FieldPatch};
use crate::series::SeriesId;

/// Identifies one instance of a series: the join key between expansion
/// output and the override store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OccurrenceKey {
    pub series_id: SeriesId,
    pub date: NaiveDate,
}

impl OccurrenceKey {
    pub fn new(series_id: SeriesId, date: NaiveDate) -> Self {
        OccurrenceKey { series_id, date }
    }
}

/// A user edit or cancellation scoped to one occurrence.
///
/// Tagged variant rather than a boolean exclusion flag, so further kinds
/// (e.g. rescheduled-to-different-date) can be added without schema churn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OccurrenceOverride {
    /// The occurrence is deleted: expansion still yields its date, the
    /// materializer omits it.
    Cancelled,
    /// The occurrence diverges from series defaults by this patch.
    Modified(FieldPatch),
}

/// One concrete, user-visible instance produced by the materializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub key: OccurrenceKey,
    /// Occurrence date plus effective start time.
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub fields: EventFields,
}
