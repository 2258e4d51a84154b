//! The scheduling service: materialized calendar views plus the edit/delete
//! policy.
//!
//! Each mutation is a single atomic decision translating a user action
//! ("delete this occurrence only", "edit the entire series") into the right
//! combination of definition update and override mutation. There is no
//! multi-step workflow or pending/committed distinction; rollback is
//! [`Scheduler::revert_occurrence`].

use std::collections::HashMap;

use cadence_core::{
    DateRange, EndCondition, Error, EventFields, FieldPatch, Occurrence, OccurrenceOverride,
    RecordStore, RecurrenceDefinition, Result, SeriesId, is_occurrence_date, materialize,
};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::auth::AuthContext;
use crate::{definitions, overrides};

/// Series-level changes applied by [`Scheduler::edit_series`].
///
/// Absent fields keep their stored value. Changing the end condition never
/// touches overrides: entries falling outside the narrowed window go
/// dormant and revive if the series is extended again.
#[derive(Debug, Clone, Default)]
pub struct SeriesEdit {
    pub base_fields: Option<EventFields>,
    pub anchor_time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub end_condition: Option<EndCondition>,
}

/// Entry point for UI event handlers: a record store with the recurrence
/// model applied on top.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
}

impl<S: RecordStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Scheduler { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Author a new series. The schedule is validated before anything is
    /// written.
    pub async fn create_series(
        &self,
        ctx: &AuthContext,
        definition: &RecurrenceDefinition,
    ) -> Result<()> {
        definitions::insert(&self.store, definition).await?;
        info!(actor = %ctx.user_id, series = %definition.series_id, "created series");
        Ok(())
    }

    /// The user-visible occurrences intersecting `range`, overrides applied.
    ///
    /// A series that does not (or no longer) exists yields an empty list.
    pub async fn occurrences(
        &self,
        series_id: SeriesId,
        range: DateRange,
    ) -> Result<Vec<Occurrence>> {
        let Some(definition) = definitions::get(&self.store, series_id).await? else {
            return Ok(Vec::new());
        };
        let overrides = self.override_map(series_id).await?;
        materialize(&definition, &overrides, range)
    }

    /// Delete the entire series: definition row plus every override.
    pub async fn delete_series(&self, ctx: &AuthContext, series_id: SeriesId) -> Result<()> {
        if !definitions::delete(&self.store, series_id).await? {
            return Err(Error::SeriesNotFound(series_id));
        }
        let removed = overrides::remove_for_series(&self.store, series_id).await?;
        info!(
            actor = %ctx.user_id,
            series = %series_id,
            overrides_removed = removed,
            "deleted series"
        );
        Ok(())
    }

    /// Delete one occurrence: records a cancellation, leaves the definition
    /// untouched.
    pub async fn delete_occurrence(
        &self,
        ctx: &AuthContext,
        series_id: SeriesId,
        date: NaiveDate,
    ) -> Result<()> {
        self.require_occurrence(series_id, date).await?;
        overrides::put(&self.store, series_id, date, &OccurrenceOverride::Cancelled).await?;
        info!(actor = %ctx.user_id, series = %series_id, %date, "cancelled occurrence");
        Ok(())
    }

    /// Edit every occurrence of the series.
    ///
    /// Existing per-occurrence overrides are left in place: an occurrence a
    /// user previously customized stays customized until explicitly
    /// reverted. Override wins over series default, always.
    pub async fn edit_series(
        &self,
        ctx: &AuthContext,
        series_id: SeriesId,
        edit: SeriesEdit,
    ) -> Result<()> {
        let Some(mut definition) = definitions::get(&self.store, series_id).await? else {
            return Err(Error::SeriesNotFound(series_id));
        };

        if let Some(fields) = edit.base_fields {
            definition.base_fields = fields;
        }
        if let Some(time) = edit.anchor_time {
            definition.anchor_time = time;
        }
        if let Some(duration) = edit.duration_minutes {
            definition.duration_minutes = duration;
        }
        if let Some(end) = edit.end_condition {
            definition.end_condition = Some(end);
        }

        definitions::update(&self.store, &definition).await?;
        info!(actor = %ctx.user_id, series = %series_id, "edited series");
        Ok(())
    }

    /// Edit one occurrence by recording a field patch over the series
    /// defaults.
    pub async fn edit_occurrence(
        &self,
        ctx: &AuthContext,
        series_id: SeriesId,
        date: NaiveDate,
        patch: FieldPatch,
    ) -> Result<()> {
        self.require_occurrence(series_id, date).await?;
        overrides::put(
            &self.store,
            series_id,
            date,
            &OccurrenceOverride::Modified(patch),
        )
        .await?;
        info!(actor = %ctx.user_id, series = %series_id, %date, "edited occurrence");
        Ok(())
    }

    /// Drop any override for the occurrence, reverting it to series
    /// defaults. No-op when it was never customized.
    pub async fn revert_occurrence(
        &self,
        ctx: &AuthContext,
        series_id: SeriesId,
        date: NaiveDate,
    ) -> Result<()> {
        self.require_occurrence(series_id, date).await?;
        let removed = overrides::remove(&self.store, series_id, date).await?;
        debug!(actor = %ctx.user_id, series = %series_id, %date, removed, "reverted occurrence");
        Ok(())
    }

    async fn override_map(
        &self,
        series_id: SeriesId,
    ) -> Result<HashMap<NaiveDate, OccurrenceOverride>> {
        Ok(overrides::list_for_series(&self.store, series_id)
            .await?
            .into_iter()
            .map(|(key, value)| (key.date, value))
            .collect())
    }

    /// Reject occurrence-scoped mutations aimed at a date the series can
    /// never produce, before anything is written. Checked against the whole
    /// series window, not any query range.
    async fn require_occurrence(&self, series_id: SeriesId, date: NaiveDate) -> Result<()> {
        let Some(definition) = definitions::get(&self.store, series_id).await? else {
            return Err(Error::OccurrenceNotFound { series_id, date });
        };
        if !is_occurrence_date(&definition, date)? {
            return Err(Error::OccurrenceNotFound { series_id, date });
        }
        Ok(())
    }
}
