//! Persistence for the `occurrence_overrides` table.
//!
//! One row per `(series, date)` exception. `put` is a full overwrite, so
//! concurrent edits to the same occurrence resolve last-write-wins. Rows are
//! never garbage-collected when a series window narrows; dormant overrides
//! stay stored so extending the series later revives prior edits.

use cadence_core::{
    Error, FieldPatch, Filter, OccurrenceKey, OccurrenceOverride, Order, RecordStore, Result, Row,
    SeriesId, StoreError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TABLE: &str = "occurrence_overrides";

/// Wire shape of one override row.
#[derive(Debug, Serialize, Deserialize)]
struct OverrideRow {
    series_id: SeriesId,
    date: NaiveDate,
    kind: OverrideKind,
    patch: Option<FieldPatch>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OverrideKind {
    Cancelled,
    Modified,
}

fn encode(series_id: SeriesId, date: NaiveDate, value: &OccurrenceOverride) -> Result<Row> {
    let (kind, patch) = match value {
        OccurrenceOverride::Cancelled => (OverrideKind::Cancelled, None),
        OccurrenceOverride::Modified(patch) => (OverrideKind::Modified, Some(patch.clone())),
    };
    let row = OverrideRow {
        series_id,
        date,
        kind,
        patch,
    };

    match serde_json::to_value(row).map_err(StoreError::from)? {
        Value::Object(map) => Ok(map),
        _ => unreachable!("struct serializes to an object"),
    }
}

fn decode(row: Row) -> Result<(OccurrenceKey, OccurrenceOverride)> {
    let row: OverrideRow = serde_json::from_value(Value::Object(row)).map_err(|e| Error::Row {
        table: TABLE,
        reason: e.to_string(),
    })?;

    let value = match (row.kind, row.patch) {
        (OverrideKind::Cancelled, _) => OccurrenceOverride::Cancelled,
        (OverrideKind::Modified, Some(patch)) => OccurrenceOverride::Modified(patch),
        (OverrideKind::Modified, None) => {
            return Err(Error::Row {
                table: TABLE,
                reason: "modified override without a patch".to_string(),
            });
        }
    };

    Ok((OccurrenceKey::new(row.series_id, row.date), value))
}

fn key_filter(series_id: SeriesId, date: NaiveDate) -> Filter {
    Filter::new()
        .eq("series_id", series_id.to_string())
        .eq("date", date.to_string())
}

/// Look up the override for one occurrence key.
pub async fn get<S: RecordStore>(
    store: &S,
    series_id: SeriesId,
    date: NaiveDate,
) -> Result<Option<OccurrenceOverride>> {
    match store.find_one(TABLE, &key_filter(series_id, date)).await? {
        Some(row) => Ok(Some(decode(row)?.1)),
        None => Ok(None),
    }
}

/// Upsert the override for one occurrence key, overwriting any prior value.
///
/// A single atomic store round-trip: concurrent writers to the same key
/// resolve last-write-wins with exactly one row left standing.
pub async fn put<S: RecordStore>(
    store: &S,
    series_id: SeriesId,
    date: NaiveDate,
    value: &OccurrenceOverride,
) -> Result<()> {
    let row = encode(series_id, date, value)?;
    store
        .upsert(TABLE, &key_filter(series_id, date), row)
        .await?;
    Ok(())
}

/// Remove the override, reverting the occurrence to series defaults.
/// No-op when absent; `true` when a row was removed.
pub async fn remove<S: RecordStore>(
    store: &S,
    series_id: SeriesId,
    date: NaiveDate,
) -> Result<bool> {
    Ok(store.delete(TABLE, &key_filter(series_id, date)).await? > 0)
}

/// Every override recorded for a series, ascending by date. Includes dormant
/// entries whose dates fall outside the current series window.
pub async fn list_for_series<S: RecordStore>(
    store: &S,
    series_id: SeriesId,
) -> Result<Vec<(OccurrenceKey, OccurrenceOverride)>> {
    let filter = Filter::new().eq("series_id", series_id.to_string());
    let rows = store
        .find_many(TABLE, &filter, Order::Ascending("date"))
        .await?;
    rows.into_iter().map(decode).collect()
}

/// Delete every override for a series; returns how many rows were removed.
pub async fn remove_for_series<S: RecordStore>(store: &S, series_id: SeriesId) -> Result<u64> {
    let filter = Filter::new().eq("series_id", series_id.to_string());
    Ok(store.delete(TABLE, &filter).await?)
}
