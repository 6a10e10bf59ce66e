//! Outbound webhook fired after a product is created
//!
//! The call is best-effort: its failure is reported to the caller but never
//! undoes the creation that triggered it.

use std::time::Duration;
use tracing::{debug, info};

use crate::models::ProductPayload;
use crate::{Error, Result};

/// Result of a webhook attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Sent,
    /// No URL configured
    Skipped,
}

/// Posts new-product notifications to a configured endpoint
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// Notifier that never sends anything
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            url: None,
        }
    }

    /// POST the product as a single-element JSON array
    pub async fn notify_product_created(&self, payload: &ProductPayload) -> Result<WebhookOutcome> {
        let Some(url) = &self.url else {
            debug!(product_id = %payload.product_id, "Webhook disabled, skipping");
            return Ok(WebhookOutcome::Skipped);
        };

        let response = self
            .http
            .post(url)
            .json(&payload.webhook_body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Webhook {
                status: status.as_u16(),
                message,
            });
        }

        info!(product_id = %payload.product_id, "Webhook sent");
        Ok(WebhookOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_notifier_skips() {
        let notifier = WebhookNotifier::disabled();

        let payload = ProductPayload {
            product_id: "P".into(),
            product_name: "N".into(),
            category: "C".into(),
            pricing: None,
            product_details: None,
            photos: None,
            availability: None,
        };
        let outcome = notifier.notify_product_created(&payload).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Skipped);
    }
}
