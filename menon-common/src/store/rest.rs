//! PostgREST client (Supabase-compatible REST endpoint)
//!
//! Requests go to `{url}/rest/v1/{table}` with the API key sent both as the
//! `apikey` header and as a bearer token. Filters use the `column=eq.value`
//! query syntax.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::{KeyFilter, RecordStore};
use crate::config::StoreCredentials;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("menon/", env!("CARGO_PKG_VERSION"));

/// Remote record store over HTTP
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(credentials: &StoreCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(credentials.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-success response into [`Error::Store`], preferring the
/// PostgREST `message` field over the raw body
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(Error::Store {
        status: status.as_u16(),
        message,
    })
}

fn filter_query(key: &KeyFilter) -> [(String, String); 1] {
    [(key.column.clone(), format!("eq.{}", key.value_text()))]
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select(&self, table: &str, order_by: Option<&str>) -> Result<Vec<Value>> {
        let mut query = vec![("select", "*".to_string())];
        if let Some(column) = order_by {
            query.push(("order", format!("{}.asc", column)));
        }

        debug!(table = %table, order_by = ?order_by, "Selecting rows");

        let response = self.request(Method::GET, table).query(&query).send().await?;
        let rows: Vec<Value> = check_status(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<()> {
        debug!(table = %table, "Inserting row");

        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update(&self, table: &str, key: &KeyFilter, changes: Value) -> Result<u64> {
        debug!(table = %table, column = %key.column, value = %key.value_text(), "Updating rows");

        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&filter_query(key))
            .json(&changes)
            .send()
            .await?;
        let rows: Vec<Value> = check_status(response).await?.json().await?;
        Ok(rows.len() as u64)
    }

    async fn delete(&self, table: &str, key: &KeyFilter) -> Result<u64> {
        debug!(table = %table, column = %key.column, value = %key.value_text(), "Deleting rows");

        let response = self
            .request(Method::DELETE, table)
            .header("Prefer", "return=representation")
            .query(&filter_query(key))
            .send()
            .await?;
        let rows: Vec<Value> = check_status(response).await?.json().await?;
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn credentials(url: &str) -> StoreCredentials {
        StoreCredentials {
            url: url.to_string(),
            api_key: "anon".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let store = RestStore::new(&credentials("https://x.supabase.co/")).unwrap();
        assert_eq!(store.table_url("offers_menon"), "https://x.supabase.co/rest/v1/offers_menon");
    }

    #[test]
    fn test_filter_query() {
        let query = filter_query(&KeyFilter::eq("id", 12));
        assert_eq!(query[0], ("id".to_string(), "eq.12".to_string()));
    }
}
