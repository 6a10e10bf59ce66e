//! Typed product/offer operations over a [`RecordStore`]

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{KeyFilter, RecordStore};
use crate::config::StoreConfig;
use crate::models::{Offer, OfferPayload, Product, ProductPayload};
use crate::{Error, Result};

const PRODUCT_KEY: &str = "product_id";
const OFFER_KEY: &str = "id";

/// Product and offer collections behind one store handle
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn RecordStore>,
    products_table: String,
    offers_table: String,
}

impl Catalog {
    pub fn new(store: Arc<dyn RecordStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            products_table: config.products_table.clone(),
            offers_table: config.offers_table.clone(),
        }
    }

    /// All products ordered by `product_id`
    pub async fn products(&self) -> Result<Vec<Product>> {
        let rows = self
            .store
            .select(&self.products_table, Some(PRODUCT_KEY))
            .await?;
        Ok(decode_rows(rows, &self.products_table))
    }

    /// Look up one product by id
    pub async fn product(&self, product_id: &str) -> Result<Product> {
        self.products()
            .await?
            .into_iter()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| Error::NotFound(format!("product {}", product_id)))
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.store
            .insert(&self.products_table, serde_json::to_value(payload)?)
            .await?;
        Ok(())
    }

    /// Update the product whose id equals `payload.product_id`
    pub async fn update_product(&self, payload: &ProductPayload) -> Result<()> {
        let key = KeyFilter::eq(PRODUCT_KEY, payload.product_id.as_str());
        let affected = self
            .store
            .update(&self.products_table, &key, serde_json::to_value(payload)?)
            .await?;
        require_affected(affected, || format!("product {}", payload.product_id))?;
        Ok(())
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        let key = KeyFilter::eq(PRODUCT_KEY, product_id);
        let affected = self.store.delete(&self.products_table, &key).await?;
        require_affected(affected, || format!("product {}", product_id))?;
        Ok(())
    }

    /// All offers ordered by `id`
    pub async fn offers(&self) -> Result<Vec<Offer>> {
        let rows = self
            .store
            .select(&self.offers_table, Some(OFFER_KEY))
            .await?;
        Ok(decode_rows(rows, &self.offers_table))
    }

    pub async fn offer(&self, id: i64) -> Result<Offer> {
        self.offers()
            .await?
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::NotFound(format!("offer #{}", id)))
    }

    pub async fn create_offer(&self, payload: &OfferPayload) -> Result<()> {
        self.store
            .insert(&self.offers_table, serde_json::to_value(payload)?)
            .await?;
        Ok(())
    }

    pub async fn update_offer(&self, id: i64, payload: &OfferPayload) -> Result<()> {
        let key = KeyFilter::eq(OFFER_KEY, id);
        let affected = self
            .store
            .update(&self.offers_table, &key, serde_json::to_value(payload)?)
            .await?;
        require_affected(affected, || format!("offer #{}", id))?;
        Ok(())
    }

    pub async fn delete_offer(&self, id: i64) -> Result<()> {
        let key = KeyFilter::eq(OFFER_KEY, id);
        let affected = self.store.delete(&self.offers_table, &key).await?;
        require_affected(affected, || format!("offer #{}", id))?;
        Ok(())
    }
}

fn require_affected(affected: u64, what: impl FnOnce() -> String) -> Result<()> {
    if affected == 0 {
        Err(Error::NotFound(what()))
    } else {
        Ok(())
    }
}

/// Decode rows, skipping (and logging) any that do not fit the model
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, table: &str) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(table = %table, error = %e, "Skipping malformed row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn catalog_with(store: MemoryStore) -> Catalog {
        Catalog::new(Arc::new(store), &StoreConfig::default())
    }

    fn memory() -> MemoryStore {
        let config = StoreConfig::default();
        MemoryStore::new()
            .with_primary_key(&config.products_table, PRODUCT_KEY)
            .with_identity(&config.offers_table, OFFER_KEY)
    }

    fn payload(id: &str) -> ProductPayload {
        ProductPayload {
            product_id: id.to_string(),
            product_name: "Table".to_string(),
            category: "Dining".to_string(),
            pricing: Some(json!({"cash": 100})),
            product_details: None,
            photos: None,
            availability: None,
        }
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let catalog = catalog_with(memory());

        catalog.create_product(&payload("P2")).await.unwrap();
        catalog.create_product(&payload("P1")).await.unwrap();

        let products = catalog.products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_id, "P1");

        let mut changed = payload("P1");
        changed.product_name = "Round table".to_string();
        catalog.update_product(&changed).await.unwrap();
        assert_eq!(catalog.product("P1").await.unwrap().product_name, "Round table");

        catalog.delete_product("P1").await.unwrap();
        assert!(matches!(catalog.product("P1").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_targets_are_not_found() {
        let catalog = catalog_with(memory());
        assert!(matches!(
            catalog.update_product(&payload("nope")).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(catalog.delete_offer(5).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_offer_lifecycle() {
        let catalog = catalog_with(memory());
        let offer = OfferPayload {
            details: "Summer sale".to_string(),
            status: Some("active".to_string()),
        };
        catalog.create_offer(&offer).await.unwrap();

        let offers = catalog.offers().await.unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, 1);

        let ended = OfferPayload {
            details: "Summer sale".to_string(),
            status: Some("ended".to_string()),
        };
        catalog.update_offer(1, &ended).await.unwrap();
        assert_eq!(catalog.offer(1).await.unwrap().status.as_deref(), Some("ended"));
    }

    #[tokio::test]
    async fn test_malformed_rows_skipped() {
        let store = memory();
        store
            .seed(
                DEFAULT_OFFERS,
                vec![json!({"id": 1, "details": "ok"}), json!({"details": "no id"})],
            )
            .await;
        let catalog = catalog_with(store);
        assert_eq!(catalog.offers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_null_name_and_category_still_listed() {
        let store = memory();
        store
            .seed(
                crate::config::DEFAULT_PRODUCTS_TABLE,
                vec![json!({
                    "product_id": "P1",
                    "product_name": null,
                    "category": null,
                    "pricing": null
                })],
            )
            .await;
        let catalog = catalog_with(store);

        let products = catalog.products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].category, "");

        let found = catalog.product("P1").await.unwrap();
        assert_eq!(found.product_name, "");
    }

    const DEFAULT_OFFERS: &str = crate::config::DEFAULT_OFFERS_TABLE;
}
