//! Error types for menon-admin HTTP handlers
//!
//! Every failure becomes a JSON body `{"error": message}` with a status code
//! matching its class: validation 400, missing record 404, remote store or
//! network 502, anything else 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid form input (400), raised before any remote call
    #[error("{0}")]
    Validation(String),

    /// Record does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// Remote store or network failure (502)
    #[error("{0}")]
    Remote(String),

    /// Local failure (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Classify a common error, prefixing its message with the failed action
    /// (e.g. "Save failed")
    pub fn during(action: &str, err: menon_common::Error) -> Self {
        use menon_common::Error as E;

        match err {
            E::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            E::InvalidInput(msg) => ApiError::Validation(msg),
            e if e.is_remote() => ApiError::Remote(format!("{}: {}", action, e)),
            e => ApiError::Internal(format!("{}: {}", action, e)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Remote(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = %status, error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
