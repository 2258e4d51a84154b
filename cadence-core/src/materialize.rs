//! Occurrence materializer: expansion output with overrides applied.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::date_range::DateRange;
use crate::error::Result;
use crate::expand::expand;
use crate::occurrence::{Occurrence, OccurrenceKey, OccurrenceOverride};
use crate::series::RecurrenceDefinition;

/// Produce the final, user-visible occurrence list for `range`.
///
/// Candidate dates come from [`expand`]; each is then checked against
/// `overrides` (keyed by occurrence date, scoped to this series). Cancelled
/// dates are omitted, modified dates get `base_fields` merged with their
/// patch, everything else gets the series defaults. Output stays in
/// ascending date order: a patched time never moves an occurrence to a
/// different date bucket.
///
/// Read-only and side-effect-free, safe to call repeatedly for rendering.
/// Overrides for dates outside `range` or the series window are simply not
/// consulted; dormant entries never cause errors.
pub fn materialize(
    definition: &RecurrenceDefinition,
    overrides: &HashMap<NaiveDate, OccurrenceOverride>,
    range: DateRange,
) -> Result<Vec<Occurrence>> {
    let dates = expand(definition, range)?;
    let mut occurrences = Vec::with_capacity(dates.len());

    for date in dates {
        let (fields, time, duration) = match overrides.get(&date) {
            Some(OccurrenceOverride::Cancelled) => continue,
            Some(OccurrenceOverride::Modified(patch)) => (
                patch.apply(&definition.base_fields),
                patch.anchor_time.unwrap_or(definition.anchor_time),
                patch.duration_minutes.unwrap_or(definition.duration_minutes),
            ),
            None => (
                definition.base_fields.clone(),
                definition.anchor_time,
                definition.duration_minutes,
            ),
        };

        occurrences.push(Occurrence {
            key: OccurrenceKey::new(definition.series_id, date),
            start: date.and_time(time),
            duration_minutes: duration,
            fields,
        });
    }

    Ok(occurrences)
}
