//! Record-store backends and the scheduling service for the cadence
//! recurrence model.
//!
//! `cadence-core` holds the pure model; this crate supplies the pieces that
//! touch a [`RecordStore`](cadence_core::RecordStore): the in-memory backend,
//! the row mappings for the `recurrence_definitions` and
//! `occurrence_overrides` tables, and the [`Scheduler`] service UI event
//! handlers call into.

pub mod auth;
pub mod definitions;
pub mod memory;
pub mod overrides;
pub mod scheduler;


pub use auth::AuthContext;
pub use memory::MemoryStore;
pub use scheduler::{Scheduler, SeriesEdit};
