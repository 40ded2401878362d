//! Manual trigger for the notification job.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::notifier;
use crate::state::AppState;

/// Response body of `POST /notifications/run`.
#[derive(Debug, Serialize)]
pub struct RunJobResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// How many events the run covered.
    pub generated: u64,
}

/// `POST /notifications/run` — run the notification job immediately.
///
/// The same pass the periodic job performs, for operators who do not want
/// to wait for the next scheduled run.
pub async fn run_notification_job(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunJobResponse>, ApiError> {
    let generated = notifier::generate_now(&state).await?;
    info!(generated, "notification job triggered manually");
    Ok(Json(RunJobResponse { ok: true, generated }))
}
