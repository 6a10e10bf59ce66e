//! Dark-mode preference endpoints

use axum::{extract::State, routing::get, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::prefs::Preferences;
use crate::AppState;

/// GET /api/preferences
pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences.get().await)
}

/// PUT /api/preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    Json(prefs): Json<Preferences>,
) -> ApiResult<Json<Preferences>> {
    let saved = state
        .preferences
        .set(prefs)
        .await
        .map_err(|e| ApiError::during("Failed to save preferences", e))?;
    Ok(Json(saved))
}

/// Build preference routes
pub fn preference_routes() -> Router<AppState> {
    Router::new().route("/api/preferences", get(get_preferences).put(put_preferences))
}
