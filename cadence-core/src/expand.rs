//! Occurrence expansion: definition + date range → concrete occurrence dates.
//!
//! Pure and deterministic, no clock access. Overrides are layered on
//! afterwards by the materializer.

use chrono::{Duration, NaiveDate};

use crate::date_range::DateRange;
use crate::error::Result;
use crate::series::RecurrenceDefinition;

/// Expand a definition into the ascending occurrence dates intersecting
/// `range`.
///
/// A range that misses the series window entirely produces an empty vector,
/// not an error. Malformed cadence/end-date combinations fail with
/// [`InvalidDefinition`](crate::Error::InvalidDefinition) before any date is
/// produced.
pub fn expand(definition: &RecurrenceDefinition, range: DateRange) -> Result<Vec<NaiveDate>> {
    definition.validate()?;

    let Some(step) = definition.cadence.step_days() else {
        // Non-recurring: the anchor is the only occurrence.
        return Ok(if range.contains(definition.anchor_date) {
            vec![definition.anchor_date]
        } else {
            Vec::new()
        });
    };

    let end = definition.effective_end_date()?.min(range.to);
    let mut date = first_on_or_after(definition.anchor_date, step, range.from);

    let mut dates = Vec::new();
    while date <= end {
        dates.push(date);
        date += Duration::days(step);
    }
    Ok(dates)
}

/// First date reachable from `anchor` by whole `step`-day increments that is
/// on or after `lower`.
fn first_on_or_after(anchor: NaiveDate, step: i64, lower: NaiveDate) -> NaiveDate {
    if lower <= anchor {
        return anchor;
    }
    // Ceiling division; gap >= 1 here since lower > anchor.
    let gap = (lower - anchor).num_days();
    let steps = (gap + step - 1) / step;
    anchor + Duration::days(steps * step)
}

/// Whether `date` is a date the series can ever produce, ignoring any query
/// range. The mutation policy uses this to reject dangling override writes.
pub fn is_occurrence_date(definition: &RecurrenceDefinition, date: NaiveDate) -> Result<bool> {
    definition.validate()?;

    let Some(step) = definition.cadence.step_days() else {
        return Ok(date == definition.anchor_date);
    };
    if date < definition.anchor_date || date > definition.effective_end_date()? {
        return Ok(false);
    }
    Ok((date - definition.anchor_date).num_days() % step == 0)
}
