//! Recurrence definitions: the single stored record a series expands from.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fields::EventFields;

/// Opaque identifier of a series, stable for its whole life and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SeriesId(Uuid);

impl SeriesId {
    pub fn new() -> Self {
        SeriesId(Uuid::new_v4())
    }
}

impl From<Uuid> for SeriesId {
    fn from(id: Uuid) -> Self {
        SeriesId(id)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Repetition interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// A single non-recurring event: exactly one occurrence, the anchor date.
    None,
    Daily,
    Weekly,
}

impl Cadence {
    /// Days between consecutive occurrences; `None` for a non-recurring event.
    pub fn step_days(self) -> Option<i64> {
        match self {
            Cadence::None => None,
            Cadence::Daily => Some(1),
            Cadence::Weekly => Some(7),
        }
    }
}

/// How a recurring series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Last possible occurrence date (inclusive).
    Until(NaiveDate),
    /// Total number of occurrences, anchor included.
    Count(u32),
}

/// One authored series.
///
/// The definition plus its overrides are the sole source of truth for which
/// occurrences exist and what they look like; no per-occurrence row is ever
/// persisted for unmodified instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceDefinition {
    pub series_id: SeriesId,
    /// The first occurrence's calendar date.
    pub anchor_date: NaiveDate,
    /// Wall-clock start time, identical for every occurrence unless overridden.
    pub anchor_time: NaiveTime,
    pub duration_minutes: u32,
    pub cadence: Cadence,
    /// End of the series; required unless `cadence` is [`Cadence::None`].
    pub end_condition: Option<EndCondition>,
    /// Series-level payload shared by all occurrences absent an override.
    pub base_fields: EventFields,
}

impl RecurrenceDefinition {
    /// Last date the series can produce.
    ///
    /// The anchor itself for [`Cadence::None`]; the explicit end date when one
    /// is set; otherwise `anchor + (count - 1) * step`. Returns the raw value
    /// without checking it against the anchor — see [`validate`].
    ///
    /// [`validate`]: RecurrenceDefinition::validate
    pub fn effective_end_date(&self) -> Result<NaiveDate> {
        let Some(step) = self.cadence.step_days() else {
            return Ok(self.anchor_date);
        };

        match self.end_condition {
            Some(EndCondition::Until(date)) => Ok(date),
            Some(EndCondition::Count(count)) => {
                if count == 0 {
                    return Err(Error::InvalidDefinition(
                        "occurrence count must be at least 1".to_string(),
                    ));
                }
                Ok(self.anchor_date + Duration::days(step * (i64::from(count) - 1)))
            }
            None => Err(Error::InvalidDefinition(
                "recurring series requires an end condition".to_string(),
            )),
        }
    }

    /// Check the cadence/end-condition combination.
    ///
    /// A recurring series must carry an end condition, and its effective end
    /// date must not precede the anchor. Non-recurring definitions always
    /// pass; any end condition they carry is ignored.
    pub fn validate(&self) -> Result<()> {
        if self.cadence.step_days().is_none() {
            return Ok(());
        }

        let end = self.effective_end_date()?;
        if end < self.anchor_date {
            return Err(Error::InvalidDefinition(format!(
                "series {} ends on {} before its anchor {}",
                self.series_id, end, self.anchor_date
            )));
        }
        Ok(())
    }
}
