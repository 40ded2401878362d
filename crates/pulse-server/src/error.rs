//! Request-path error taxonomy and HTTP status mapping.
//!
//! Only request-path failures live here. Delivery and connection errors
//! stay inside the `ws` module — they are logged and counted there and
//! never surface to any HTTP caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use pulse_core::events::ValidationError;
use pulse_store::StoreError;

use crate::auth::AuthError;

/// Errors a request handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, or rejected credential → 401.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Invalid creation input → 422, before any side effect.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failure → 500; the event is considered never-created.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    /// Anything else that should not leak details to the caller → 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::Storage(e) => {
                error!(error = %e, "request failed on persistence");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure".to_string())
            }
            Self::Internal(msg) => {
                error!(error = %msg, "internal request failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
