//! Product endpoints: list, detail, forms and mutations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use menon_common::jsonflat::loses_structure_when_flattened;
use menon_common::models::Product;
use menon_common::webhook::WebhookOutcome;
use tracing::{info, warn};

use super::{MutationResponse, Notice};
use crate::error::{ApiError, ApiResult};
use crate::view::products::{
    render_detail, render_form, render_products, ProductDetail, ProductForm, ProductSubmission,
    ProductViewState, ProductsView,
};
use crate::AppState;

const LOAD_FAILED: &str = "Failed to load products";
const SAVE_FAILED: &str = "Save failed";
const DELETE_FAILED: &str = "Delete failed";

/// GET /api/products?search=&category=
pub async fn list_products(
    State(state): State<AppState>,
    Query(view): Query<ProductViewState>,
) -> ApiResult<Json<ProductsView>> {
    let records = load_products(&state).await?;
    Ok(Json(render_products(&records, &view)))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state
        .catalog
        .product(&product_id)
        .await
        .map_err(|e| ApiError::during(LOAD_FAILED, e))?;
    Ok(Json(render_detail(&product)))
}

/// GET /api/products/form
pub async fn create_form(State(state): State<AppState>) -> ApiResult<Json<ProductForm>> {
    let records = load_products(&state).await?;
    Ok(Json(render_form(None, &records)))
}

/// GET /api/products/:id/form
pub async fn edit_form(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ProductForm>> {
    let records = load_products(&state).await?;
    let product = records
        .iter()
        .find(|p| p.product_id == product_id)
        .ok_or_else(|| ApiError::NotFound(format!("Not found: product {}", product_id)))?;
    Ok(Json(render_form(Some(product), &records)))
}

/// POST /api/products
///
/// Creates the product, then fires the new-product webhook. A webhook failure
/// is reported as an error notice; the product stays created.
pub async fn create_product(
    State(state): State<AppState>,
    Json(submission): Json<ProductSubmission>,
) -> ApiResult<(StatusCode, Json<MutationResponse>)> {
    let payload = submission.into_payload().map_err(ApiError::Validation)?;

    state
        .catalog
        .create_product(&payload)
        .await
        .map_err(|e| ApiError::during(SAVE_FAILED, e))?;
    info!(product_id = %payload.product_id, "Product created");

    let mut response = MutationResponse::with(Notice::success("Product created"));
    match state.webhook.notify_product_created(&payload).await {
        Ok(WebhookOutcome::Sent) => response.push(Notice::info("Webhook sent")),
        Ok(WebhookOutcome::Skipped) => {
            response.push(Notice::info("Webhook not configured, skipped"))
        }
        Err(e) => {
            warn!(product_id = %payload.product_id, error = %e, "Webhook failed");
            response.push(Notice::error(format!("Webhook failed: {}", e)));
        }
    }

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/products/:id
///
/// The id in the path wins over any id in the body.
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(mut submission): Json<ProductSubmission>,
) -> ApiResult<Json<MutationResponse>> {
    submission.product_id = product_id;
    let payload = submission.into_payload().map_err(ApiError::Validation)?;

    let existing = state
        .catalog
        .product(&payload.product_id)
        .await
        .map_err(|e| ApiError::during(SAVE_FAILED, e))?;

    state
        .catalog
        .update_product(&payload)
        .await
        .map_err(|e| ApiError::during(SAVE_FAILED, e))?;
    info!(product_id = %payload.product_id, "Product updated");

    let mut response = MutationResponse::with(Notice::success("Product updated"));
    let flattened = nested_columns(&existing);
    if !flattened.is_empty() {
        warn!(
            product_id = %payload.product_id,
            columns = ?flattened,
            "Nested values were saved as flat key/value pairs"
        );
        response.push(Notice::info(format!(
            "Nested values in {} were saved as flat key/value pairs",
            flattened.join(", ")
        )));
    }

    Ok(Json(response))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    state
        .catalog
        .delete_product(&product_id)
        .await
        .map_err(|e| ApiError::during(DELETE_FAILED, e))?;
    info!(product_id = %product_id, "Product deleted");

    Ok(Json(MutationResponse::with(Notice::success("Product deleted"))))
}

async fn load_products(state: &AppState) -> ApiResult<Vec<Product>> {
    state
        .catalog
        .products()
        .await
        .map_err(|e| ApiError::during(LOAD_FAILED, e))
}

/// JSON columns whose stored structure the flat editor cannot represent
fn nested_columns(product: &Product) -> Vec<&'static str> {
    [
        ("pricing", &product.pricing),
        ("product_details", &product.product_details),
        ("photos", &product.photos),
    ]
    .into_iter()
    .filter(|(_, value)| loses_structure_when_flattened(value))
    .map(|(column, _)| column)
    .collect()
}

/// Build product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/form", get(create_form))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/:id/form", get(edit_form))
}
