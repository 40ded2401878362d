//! Liveness endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// `GET /health` — process status plus live connection count.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": state.registry.connection_count(),
    }))
}
