//! In-memory record store, for tests and single-process embedding.

use std::cmp::Ordering;
use std::collections::HashMap;

use cadence_core::{Filter, Order, RecordStore, Row, StoreError};
use serde_json::Value;
use tokio::sync::Mutex;

/// A [`RecordStore`] holding all rows in process memory.
///
/// Implements the same semantics the table modules expect from a hosted
/// backend: equality filters, single-column ordering, column-wise row
/// patches, full-overwrite writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl RecordStore for MemoryStore {
    async fn find_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| filter.matches(row)).cloned()))
    }

    async fn find_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match order {
            Order::Unsorted => {}
            Order::Ascending(column) => rows.sort_by(|a, b| compare_column(a, b, column)),
            Order::Descending(column) => rows.sort_by(|a, b| compare_column(b, a, column)),
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn upsert(&self, table: &str, filter: &Filter, row: Row) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        let rows = tables.entry(table.to_string()).or_default();
        // Replace-then-append under the one lock keeps the key unique even
        // when two writers race on the same filter.
        rows.retain(|existing| !filter.matches(existing));
        rows.push(row);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let mut touched = 0;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}

/// Compare two rows on one column. Strings compare lexically (ISO dates sort
/// correctly), numbers numerically; anything else keeps insertion order.
fn compare_column(a: &Row, b: &Row, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn insert_find_update_delete() {
        let store = MemoryStore::new();
        store
            .insert("t", row(json!({"id": "a", "n": 1})))
            .await
            .unwrap();
        store
            .insert("t", row(json!({"id": "b", "n": 2})))
            .await
            .unwrap();

        let found = store
            .find_one("t", &Filter::new().eq("id", "b"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("n"), Some(&json!(2)));

        let touched = store
            .update("t", &Filter::new().eq("id", "a"), row(json!({"n": 10})))
            .await
            .unwrap();
        assert_eq!(touched, 1);
        let found = store
            .find_one("t", &Filter::new().eq("id", "a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("n"), Some(&json!(10)));

        let removed = store.delete("t", &Filter::new().eq("id", "a")).await.unwrap();
        assert_eq!(removed, 1);
        assert!(
            store
                .find_one("t", &Filter::new().eq("id", "a"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn upsert_leaves_exactly_one_row_for_the_filter() {
        let store = MemoryStore::new();
        let filter = Filter::new().eq("id", "a");

        // First upsert inserts
        store
            .upsert("t", &filter, row(json!({"id": "a", "n": 1})))
            .await
            .unwrap();
        // Second replaces, even with a stale duplicate already present
        store
            .insert("t", row(json!({"id": "a", "n": 99})))
            .await
            .unwrap();
        store
            .upsert("t", &filter, row(json!({"id": "a", "n": 2})))
            .await
            .unwrap();

        let rows = store.find_many("t", &filter, Order::Unsorted).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("n"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn find_many_sorts_by_string_column() {
        let store = MemoryStore::new();
        for date in ["2024-01-05", "2024-01-01", "2024-01-03"] {
            store
                .insert("t", row(json!({"date": date})))
                .await
                .unwrap();
        }

        let rows = store
            .find_many("t", &Filter::new(), Order::Ascending("date"))
            .await
            .unwrap();
        let dates: Vec<&Value> = rows.iter().filter_map(|r| r.get("date")).collect();
        assert_eq!(
            dates,
            vec![&json!("2024-01-01"), &json!("2024-01-03"), &json!("2024-01-05")]
        );
    }

    #[tokio::test]
    async fn missing_table_behaves_as_empty() {
        let store = MemoryStore::new();
        assert!(
            store
                .find_one("nope", &Filter::new())
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.delete("nope", &Filter::new()).await.unwrap(), 0);
        assert_eq!(
            store
                .update("nope", &Filter::new(), Row::new())
                .await
                .unwrap(),
            0
        );
    }
}
