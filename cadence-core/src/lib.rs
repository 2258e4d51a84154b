//! Core types and algorithms for the cadence recurring-series model.
//!
//! A series is stored once (`RecurrenceDefinition`) and expanded on demand
//! into dated occurrences; per-occurrence edits and cancellations are layered
//! on as `OccurrenceOverride`s instead of persisting a row per instance.
//! Everything in this crate is pure computation — persistence backends and
//! the scheduling service live in `cadence-store`.

// We intentionally use native `async fn` in the `RecordStore` trait.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod date_range;
pub mod error;
pub mod expand;
pub mod fields;
pub mod materialize;
pub mod occurrence;
pub mod series;
pub mod store;

pub use date_range::DateRange;
pub use error::{Error, Result, StoreError};
pub use expand::{expand, is_occurrence_date};
pub use fields::{EventFields, FieldPatch};
pub use materialize::materialize;
pub use occurrence::{Occurrence, OccurrenceKey, OccurrenceOverride};
pub use series::{Cadence, EndCondition, RecurrenceDefinition, SeriesId};
pub use store::{Filter, Order, RecordStore, Row};
