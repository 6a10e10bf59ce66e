//! Remote record store access
//!
//! [`RecordStore`] is the seam to the hosted backend: generic
//! select/insert/update/delete over named collections with an equality key
//! filter. [`RestStore`] speaks the PostgREST dialect over HTTP;
//! [`MemoryStore`] keeps rows in-process. [`Catalog`] layers the typed
//! product/offer operations on top of either.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

mod catalog;
mod memory;
mod rest;

pub use catalog::Catalog;
pub use memory::MemoryStore;
pub use rest::RestStore;

/// Equality filter selecting the rows an update/delete applies to
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFilter {
    pub column: String,
    pub value: Value,
}

impl KeyFilter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Filter value as query text (strings unquoted)
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// True when `row` carries the filtered value in the filtered column
    pub fn matches(&self, row: &Value) -> bool {
        row.get(&self.column)
            .map(|v| v == &self.value || value_as_text(v) == self.value_text())
            .unwrap_or(false)
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Generic access to the remote collections
///
/// Update and delete return the number of affected rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows of `table`, ordered ascending by `order_by` when given
    async fn select(&self, table: &str, order_by: Option<&str>) -> Result<Vec<Value>>;

    /// Insert one row
    async fn insert(&self, table: &str, row: Value) -> Result<()>;

    /// Merge `changes` into every row matching `key`
    async fn update(&self, table: &str, key: &KeyFilter, changes: Value) -> Result<u64>;

    /// Remove every row matching `key`
    async fn delete(&self, table: &str, key: &KeyFilter) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_filter_matches_string_and_number() {
        let by_id = KeyFilter::eq("id", 3);
        assert!(by_id.matches(&json!({"id": 3})));
        assert!(!by_id.matches(&json!({"id": 4})));
        assert!(!by_id.matches(&json!({"other": 3})));

        let by_product = KeyFilter::eq("product_id", "PRD-1");
        assert_eq!(by_product.value_text(), "PRD-1");
        assert!(by_product.matches(&json!({"product_id": "PRD-1"})));
    }
}
