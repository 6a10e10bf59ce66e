//! Offer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::info;

use super::{MutationResponse, Notice};
use crate::error::{ApiError, ApiResult};
use crate::view::offers::{render_offer_form, render_offers, OfferForm, OfferSubmission};
use crate::view::{OfferViewState, OffersView};
use crate::AppState;

/// GET /api/offers?search=&page=
///
/// Clients send `page=1` along with a changed search term; out-of-range pages
/// are clamped.
pub async fn list_offers(
    State(state): State<AppState>,
    Query(view): Query<OfferViewState>,
) -> ApiResult<Json<OffersView>> {
    let records = state
        .catalog
        .offers()
        .await
        .map_err(|e| ApiError::during("Failed to load offers", e))?;
    Ok(Json(render_offers(&records, &view)))
}

/// GET /api/offers/form
pub async fn create_form() -> Json<OfferForm> {
    Json(render_offer_form(None))
}

/// GET /api/offers/:id/form
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<OfferForm>> {
    let offer = state
        .catalog
        .offer(id)
        .await
        .map_err(|e| ApiError::during("Failed to load offers", e))?;
    Ok(Json(render_offer_form(Some(&offer))))
}

/// POST /api/offers
pub async fn create_offer(
    State(state): State<AppState>,
    Json(submission): Json<OfferSubmission>,
) -> ApiResult<(StatusCode, Json<MutationResponse>)> {
    let payload = submission.into_payload().map_err(ApiError::Validation)?;

    state
        .catalog
        .create_offer(&payload)
        .await
        .map_err(|e| ApiError::during("Save failed", e))?;
    info!("Offer created");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::with(Notice::success("Offer created"))),
    ))
}

/// PUT /api/offers/:id
pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(submission): Json<OfferSubmission>,
) -> ApiResult<Json<MutationResponse>> {
    let payload = submission.into_payload().map_err(ApiError::Validation)?;

    state
        .catalog
        .update_offer(id, &payload)
        .await
        .map_err(|e| ApiError::during("Save failed", e))?;
    info!(offer_id = id, "Offer updated");

    Ok(Json(MutationResponse::with(Notice::success("Offer updated"))))
}

/// DELETE /api/offers/:id
pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MutationResponse>> {
    state
        .catalog
        .delete_offer(id)
        .await
        .map_err(|e| ApiError::during("Delete failed", e))?;
    info!(offer_id = id, "Offer deleted");

    Ok(Json(MutationResponse::with(Notice::success("Offer deleted"))))
}

/// Build offer routes
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/offers", get(list_offers).post(create_offer))
        .route("/api/offers/form", get(create_form))
        .route("/api/offers/:id", put(update_offer).delete(delete_offer))
        .route("/api/offers/:id/form", get(edit_form))
}
