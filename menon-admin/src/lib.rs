//! menon-admin library - catalog administration service
//!
//! Serves the products and offers screens as JSON view models over HTTP.
//! Records live in a remote store; every request fetches them fresh.

use std::sync::Arc;

use axum::Router;
use menon_common::store::Catalog;
use menon_common::webhook::WebhookNotifier;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;
pub mod prefs;
pub mod startup;
pub mod view;

use prefs::PreferencesStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Products and offers collections
    pub catalog: Catalog,
    /// Fired after a product is created
    pub webhook: Arc<WebhookNotifier>,
    pub preferences: Arc<PreferencesStore>,
}

impl AppState {
    pub fn new(catalog: Catalog, webhook: WebhookNotifier, preferences: PreferencesStore) -> Self {
        Self {
            catalog,
            webhook: Arc::new(webhook),
            preferences: Arc::new(preferences),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::product_routes())
        .merge(api::offer_routes())
        .merge(api::preference_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
