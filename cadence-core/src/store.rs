//! The abstract record-store collaborator.
//!
//! The recurrence model persists through a generic table-shaped store
//! (find/insert/update/delete with column-equality filters) rather than a
//! concrete backend. Rows travel as JSON objects, the shape a hosted-backend
//! client hands out. `cadence-store` provides the in-memory backend and the
//! table mappings for definitions and overrides.

use serde_json::Value;

use crate::error::StoreError;

/// One stored row, as a JSON object.
pub type Row = serde_json::Map<String, Value>;

/// Conjunction of column equality checks.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    /// Add an equality clause: `column = value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((column.to_string(), value.into()));
        self
    }

    /// Whether `row` satisfies every clause.
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Sort order for [`RecordStore::find_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Unsorted,
    Ascending(&'static str),
    Descending(&'static str),
}

/// Abstraction over the backing record store.
///
/// Writes are immediately visible to subsequent reads through the same store;
/// no eventual-consistency window is assumed. `update` patches every matching
/// row column-wise and reports how many rows matched; `delete` reports how
/// many rows were removed. Concurrent writes to the same row resolve
/// last-write-wins — the store is a thin persistence wrapper, not a
/// replicated cache.
pub trait RecordStore: Send + Sync {
    async fn find_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError>;

    async fn find_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError>;

    /// Replace every row matching `filter` with `row`, inserting it when
    /// none match. A single atomic round-trip: no matter how writers
    /// interleave, the filter matches exactly one row afterwards. Hosted
    /// backends provide this natively; backends here must not implement it
    /// as a check-then-act pair.
    async fn upsert(&self, table: &str, filter: &Filter, row: Row) -> Result<(), StoreError>;

    async fn update(&self, table: &str, filter: &Filter, patch: Row)
    -> Result<u64, StoreError>;

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError>;
}
