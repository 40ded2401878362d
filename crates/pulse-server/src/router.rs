//! Route table and middleware assembly.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use axum::extract::State;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.settings.server.cors_enabled;
    let router = Router::new()
        .route(
            "/events/",
            axum::routing::post(crate::http::events::create_event)
                .get(crate::http::events::list_events),
        )
        .route("/analytics/me", get(crate::http::analytics::my_analytics))
        .route(
            "/notifications/run",
            axum::routing::post(crate::http::notifications::run_notification_job),
        )
        .route("/health", get(crate::http::health::health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/ws", get(crate::ws::connection::ws_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// `GET /metrics` — Prometheus text format, 404 when no recorder is installed.
async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<String, (StatusCode, Json<serde_json::Value>)> {
    match &state.metrics {
        Some(handle) => Ok(crate::metrics::render(handle)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "metrics recorder not installed" })),
        )),
    }
}
