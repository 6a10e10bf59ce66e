//! Record models for the two managed collections
//!
//! `Product` rows are keyed by a user-supplied `product_id`; `Offer` rows by an
//! auto-assigned integer `id`. JSON columns are kept as raw [`Value`]s because
//! the store may hand them back either structured or as JSON-encoded text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::jsonflat;

/// Separator used to store multiple availability options in one text column
pub const AVAILABILITY_SEPARATOR: &str = " - ";

/// Availability options offered by the product form
pub const AVAILABILITY_OPTIONS: [&str; 6] = [
    "Available in stock",
    "Available in showroom Nasr City",
    "Available in showroom Maadi",
    "Available in showroom Faisal",
    "Available in showroom 6th October City",
    "Out of stock",
];

/// Product row as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default)]
    pub pricing: Value,
    #[serde(default)]
    pub product_details: Value,
    #[serde(default)]
    pub photos: Value,
    #[serde(default)]
    pub availability: Option<String>,
}

impl Product {
    /// Photo URLs recovered from whatever encoding the row uses
    pub fn photo_urls(&self) -> Vec<String> {
        jsonflat::normalize_string_list(&self.photos)
    }
}

// A null text column reads as empty instead of rejecting the row.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Offer row as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Column values written on product insert/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub pricing: Option<Value>,
    pub product_details: Option<Value>,
    pub photos: Option<Value>,
    pub availability: Option<String>,
}

impl ProductPayload {
    /// Webhook body: a single-element array whose JSON columns are
    /// pre-serialized to text
    pub fn webhook_body(&self) -> Value {
        let encode = |v: &Option<Value>| v.as_ref().map(Value::to_string);
        serde_json::json!([{
            "product_id": self.product_id,
            "product_name": self.product_name,
            "category": self.category,
            "pricing": encode(&self.pricing),
            "photos": encode(&self.photos),
            "product_details": encode(&self.product_details),
            "availability": self.availability,
        }])
    }
}

/// Column values written on offer insert/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferPayload {
    pub details: String,
    pub status: Option<String>,
}

/// Join checked availability options; `None` when nothing is checked
pub fn join_availability<S: AsRef<str>>(options: &[S]) -> Option<String> {
    let joined = options
        .iter()
        .map(|o| o.as_ref().trim())
        .filter(|o| !o.is_empty())
        .collect::<Vec<_>>()
        .join(AVAILABILITY_SEPARATOR);
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Split stored availability text back into trimmed options
pub fn split_availability(text: &str) -> Vec<String> {
    text.split(AVAILABILITY_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserialize_with_encoded_columns() {
        let row = json!({
            "product_id": "PRD-001",
            "product_name": "Sofa",
            "category": "Living",
            "pricing": "{\"cash\": 1000}",
            "product_details": null,
            "photos": ["u1", "u2"],
            "availability": "Available in stock - Out of stock"
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.product_id, "PRD-001");
        assert_eq!(product.pricing, json!("{\"cash\": 1000}"));
        assert_eq!(product.product_details, Value::Null);
        assert_eq!(product.photo_urls(), vec!["u1", "u2"]);
        assert_eq!(
            product.availability.as_deref().map(split_availability),
            Some(vec!["Available in stock".to_string(), "Out of stock".to_string()])
        );
    }

    #[test]
    fn test_product_missing_columns_default() {
        let product: Product = serde_json::from_value(json!({"product_id": "X"})).unwrap();
        assert_eq!(product.product_name, "");
        assert_eq!(product.photos, Value::Null);
        assert!(product.availability.is_none());
    }

    #[test]
    fn test_product_null_name_and_category_read_as_empty() {
        let product: Product = serde_json::from_value(json!({
            "product_id": "P1",
            "product_name": null,
            "category": null,
            "pricing": {"cash": 10}
        }))
        .unwrap();
        assert_eq!(product.product_id, "P1");
        assert_eq!(product.product_name, "");
        assert_eq!(product.category, "");
        assert_eq!(product.pricing, json!({"cash": 10}));
    }

    #[test]
    fn test_offer_deserialize() {
        let offer: Offer = serde_json::from_value(json!({"id": 7, "details": "10% off"})).unwrap();
        assert_eq!(offer.id, 7);
        assert_eq!(offer.details.as_deref(), Some("10% off"));
        assert!(offer.status.is_none());
    }

    #[test]
    fn test_webhook_body_serializes_json_columns() {
        let payload = ProductPayload {
            product_id: "PRD-9".into(),
            product_name: "Chair".into(),
            category: "Dining".into(),
            pricing: Some(json!({"cash": 250})),
            product_details: None,
            photos: Some(json!({"front": "u1"})),
            availability: None,
        };
        let body = payload.webhook_body();
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["pricing"], json!("{\"cash\":250}"));
        assert_eq!(body[0]["photos"], json!("{\"front\":\"u1\"}"));
        assert_eq!(body[0]["product_details"], Value::Null);
        assert_eq!(body[0]["availability"], Value::Null);
    }

    #[test]
    fn test_join_and_split_availability() {
        assert_eq!(join_availability::<&str>(&[]), None);
        assert_eq!(
            join_availability(&["Available in stock", "Out of stock"]),
            Some("Available in stock - Out of stock".to_string())
        );
        assert_eq!(
            split_availability("Available in stock - Available in showroom Maadi"),
            vec!["Available in stock", "Available in showroom Maadi"]
        );
    }
}
