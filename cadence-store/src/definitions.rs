//! Persistence for the `recurrence_definitions` table.
//!
//! One row per series: flat columns for the schedule, JSON columns for the
//! list/map payload fields. No per-occurrence rows exist anywhere; long
//! series stay a single row.

use std::collections::BTreeMap;

use cadence_core::{
    Cadence, EndCondition, Error, EventFields, Filter, RecordStore, RecurrenceDefinition, Result,
    Row, SeriesId, StoreError,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TABLE: &str = "recurrence_definitions";

/// Wire shape of one definition row.
#[derive(Debug, Serialize, Deserialize)]
struct DefinitionRow {
    id: SeriesId,
    anchor_date: NaiveDate,
    anchor_time: NaiveTime,
    duration_minutes: u32,
    cadence: Cadence,
    end_date: Option<NaiveDate>,
    occurrence_count: Option<u32>,
    title: String,
    description: Option<String>,
    location: Option<String>,
    link: Option<String>,
    participants: Vec<String>,
    attributes: BTreeMap<String, String>,
}

fn encode(definition: &RecurrenceDefinition) -> Result<Row> {
    let (end_date, occurrence_count) = match definition.end_condition {
        Some(EndCondition::Until(date)) => (Some(date), None),
        Some(EndCondition::Count(count)) => (None, Some(count)),
        None => (None, None),
    };

    let row = DefinitionRow {
        id: definition.series_id,
        anchor_date: definition.anchor_date,
        anchor_time: definition.anchor_time,
        duration_minutes: definition.duration_minutes,
        cadence: definition.cadence,
        end_date,
        occurrence_count,
        title: definition.base_fields.title.clone(),
        description: definition.base_fields.description.clone(),
        location: definition.base_fields.location.clone(),
        link: definition.base_fields.link.clone(),
        participants: definition.base_fields.participants.clone(),
        attributes: definition.base_fields.attributes.clone(),
    };

    match serde_json::to_value(row).map_err(StoreError::from)? {
        Value::Object(map) => Ok(map),
        _ => unreachable!("struct serializes to an object"),
    }
}

fn decode(row: Row) -> Result<RecurrenceDefinition> {
    let row: DefinitionRow = serde_json::from_value(Value::Object(row)).map_err(|e| Error::Row {
        table: TABLE,
        reason: e.to_string(),
    })?;

    let end_condition = match (row.end_date, row.occurrence_count) {
        (Some(date), _) => Some(EndCondition::Until(date)),
        (None, Some(count)) => Some(EndCondition::Count(count)),
        (None, None) => None,
    };

    Ok(RecurrenceDefinition {
        series_id: row.id,
        anchor_date: row.anchor_date,
        anchor_time: row.anchor_time,
        duration_minutes: row.duration_minutes,
        cadence: row.cadence,
        end_condition,
        base_fields: EventFields {
            title: row.title,
            description: row.description,
            location: row.location,
            link: row.link,
            participants: row.participants,
            attributes: row.attributes,
        },
    })
}

fn id_filter(series_id: SeriesId) -> Filter {
    Filter::new().eq("id", series_id.to_string())
}

/// Insert a new definition row.
///
/// Fails with [`Error::InvalidDefinition`] before any store round-trip when
/// the schedule is malformed, and with [`Error::SeriesExists`] when a row
/// with this id is already stored — one definition per series, always.
pub async fn insert<S: RecordStore>(store: &S, definition: &RecurrenceDefinition) -> Result<()> {
    definition.validate()?;
    if store
        .find_one(TABLE, &id_filter(definition.series_id))
        .await?
        .is_some()
    {
        return Err(Error::SeriesExists(definition.series_id));
    }
    store.insert(TABLE, encode(definition)?).await?;
    Ok(())
}

/// Load one definition; `None` when the series does not exist.
pub async fn get<S: RecordStore>(
    store: &S,
    series_id: SeriesId,
) -> Result<Option<RecurrenceDefinition>> {
    match store.find_one(TABLE, &id_filter(series_id)).await? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// Overwrite the stored row with `definition`.
///
/// Fails with [`Error::SeriesNotFound`] when no row matched, and with
/// [`Error::InvalidDefinition`] (before writing) when the new schedule is
/// malformed.
pub async fn update<S: RecordStore>(store: &S, definition: &RecurrenceDefinition) -> Result<()> {
    definition.validate()?;
    let touched = store
        .update(TABLE, &id_filter(definition.series_id), encode(definition)?)
        .await?;
    if touched == 0 {
        return Err(Error::SeriesNotFound(definition.series_id));
    }
    Ok(())
}

/// Delete the definition row; `true` when a row existed.
pub async fn delete<S: RecordStore>(store: &S, series_id: SeriesId) -> Result<bool> {
    Ok(store.delete(TABLE, &id_filter(series_id)).await? > 0)
}
