//! Per-user analytics.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::authenticate;
use crate::state::AppState;

/// Response body of `GET /analytics/me`.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    /// How many events the caller has created, 0 for a new user.
    #[serde(rename = "totalEvents")]
    pub total_events: u64,
}

/// `GET /analytics/me` — the caller's event counter.
pub async fn my_analytics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;

    let store = Arc::clone(&state.store);
    let total_events = tokio::task::spawn_blocking(move || store.total_events(&user_id))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))??;
    Ok(Json(AnalyticsResponse { total_events }))
}
