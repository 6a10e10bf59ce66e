//! In-process record store
//!
//! Mirrors the parts of the remote store the admin service relies on:
//! identity columns assigned on insert, primary-key conflicts, ordered
//! selects and equality-keyed update/delete.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{KeyFilter, RecordStore};
use crate::{Error, Result};

#[derive(Debug, Clone)]
enum KeyKind {
    /// Integer assigned by the store when the row omits it
    Identity,
    /// Supplied by the caller, must be unique
    Supplied,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Value>,
    next_id: i64,
}

/// Record store kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    keys: HashMap<String, (String, KeyKind)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an auto-incrementing integer key for `table`
    pub fn with_identity(mut self, table: &str, column: &str) -> Self {
        self.keys
            .insert(table.to_string(), (column.to_string(), KeyKind::Identity));
        self
    }

    /// Declare a caller-supplied unique key for `table`
    pub fn with_primary_key(mut self, table: &str, column: &str) -> Self {
        self.keys
            .insert(table.to_string(), (column.to_string(), KeyKind::Supplied));
        self
    }

    /// Replace the rows of `table` (test seeding)
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().await;
        let entry = tables.entry(table.to_string()).or_default();
        entry.next_id = match self.identity_column(table) {
            Some(column) => rows
                .iter()
                .filter_map(|r| r.get(column).and_then(Value::as_i64))
                .max()
                .unwrap_or(0),
            None => 0,
        };
        entry.rows = rows;
    }

    fn identity_column(&self, table: &str) -> Option<&str> {
        match self.keys.get(table) {
            Some((column, KeyKind::Identity)) => Some(column.as_str()),
            _ => None,
        }
    }

    /// Snapshot of the rows of `table` in insertion order
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }
}

fn compare_column(a: &Value, b: &Value, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) | (Some(Value::Null), Some(_)) => Ordering::Greater,
        (Some(_), None) | (Some(_), Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, table: &str, order_by: Option<&str>) -> Result<Vec<Value>> {
        let mut rows = self.rows(table).await;
        if let Some(column) = order_by {
            rows.sort_by(|a, b| compare_column(a, b, column));
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<()> {
        let Some(fields) = row.as_object_mut() else {
            return Err(Error::InvalidInput("row must be a JSON object".to_string()));
        };

        let mut tables = self.tables.write().await;
        let entry = tables.entry(table.to_string()).or_default();

        match self.keys.get(table) {
            Some((column, KeyKind::Identity)) => match fields.get(column).and_then(Value::as_i64) {
                // Explicit ids move the sequence past them
                Some(id) => entry.next_id = entry.next_id.max(id),
                None => {
                    entry.next_id += 1;
                    fields.insert(column.clone(), Value::from(entry.next_id));
                }
            },
            Some((column, KeyKind::Supplied)) => {
                let key = KeyFilter::eq(column.clone(), fields.get(column).cloned().unwrap_or_default());
                if entry.rows.iter().any(|r| key.matches(r)) {
                    return Err(Error::Store {
                        status: 409,
                        message: format!(
                            "duplicate key value violates unique constraint on {}",
                            column
                        ),
                    });
                }
            }
            None => {}
        }

        entry.rows.push(row);
        Ok(())
    }

    async fn update(&self, table: &str, key: &KeyFilter, changes: Value) -> Result<u64> {
        let Value::Object(changes) = changes else {
            return Err(Error::InvalidInput("changes must be a JSON object".to_string()));
        };

        let mut tables = self.tables.write().await;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in entry.rows.iter_mut().filter(|r| key.matches(r)) {
            if let Some(fields) = row.as_object_mut() {
                for (column, value) in &changes {
                    fields.insert(column.clone(), value.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete(&self, table: &str, key: &KeyFilter) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = entry.rows.len();
        entry.rows.retain(|r| !key.matches(r));
        Ok((before - entry.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_identity("offers", "id")
            .with_primary_key("products", "product_id")
    }

    #[tokio::test]
    async fn test_identity_assigned_on_insert() {
        let store = store();
        store.insert("offers", json!({"details": "a"})).await.unwrap();
        store.insert("offers", json!({"details": "b"})).await.unwrap();

        let rows = store.select("offers", Some("id")).await.unwrap();
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["id"], json!(2));
    }

    #[tokio::test]
    async fn test_identity_continues_after_seed() {
        let store = store();
        store.seed("offers", vec![json!({"id": 40, "details": "x"})]).await;
        store.insert("offers", json!({"details": "y"})).await.unwrap();
        assert_eq!(store.rows("offers").await[1]["id"], json!(41));
    }

    #[tokio::test]
    async fn test_identity_follows_declared_column() {
        let store = MemoryStore::new().with_identity("coupons", "coupon_no");
        store
            .seed("coupons", vec![json!({"coupon_no": 7, "id": 100})])
            .await;
        store.insert("coupons", json!({})).await.unwrap();
        assert_eq!(store.rows("coupons").await[1]["coupon_no"], json!(8));
    }

    #[tokio::test]
    async fn test_explicit_id_advances_identity() {
        let store = store();
        store.insert("offers", json!({"id": 5, "details": "manual"})).await.unwrap();
        store.insert("offers", json!({"details": "auto"})).await.unwrap();

        let rows = store.rows("offers").await;
        assert_eq!(rows[1]["id"], json!(6));
    }

    #[tokio::test]
    async fn test_duplicate_primary_key_rejected() {
        let store = store();
        store.insert("products", json!({"product_id": "P1"})).await.unwrap();
        let err = store
            .insert("products", json!({"product_id": "P1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_select_ordered() {
        let store = store();
        store
            .seed(
                "products",
                vec![json!({"product_id": "B"}), json!({"product_id": "A"})],
            )
            .await;
        let rows = store.select("products", Some("product_id")).await.unwrap();
        assert_eq!(rows[0]["product_id"], json!("A"));

        let unordered = store.select("products", None).await.unwrap();
        assert_eq!(unordered[0]["product_id"], json!("B"));
    }

    #[tokio::test]
    async fn test_update_and_delete_by_key() {
        let store = store();
        store
            .seed("offers", vec![json!({"id": 1, "status": "draft"}), json!({"id": 2})])
            .await;

        let updated = store
            .update("offers", &KeyFilter::eq("id", 1), json!({"status": "active"}))
            .await
            .unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.rows("offers").await[0]["status"], json!("active"));

        let deleted = store.delete("offers", &KeyFilter::eq("id", 2)).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.rows("offers").await.len(), 1);

        let missing = store.delete("offers", &KeyFilter::eq("id", 99)).await.unwrap();
        assert_eq!(missing, 0);
    }
}
