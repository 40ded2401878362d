//! Background notification job.
//!
//! Every `notifications.intervalHours` the job scans events created within
//! the same window and writes one `upcoming_event` notification per event.
//! `POST /notifications/run` triggers the identical pass on demand.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::metrics::NOTIFICATIONS_GENERATED_TOTAL;
use crate::state::AppState;

/// Run one generation pass over the store.
pub(crate) async fn generate_now(state: &AppState) -> Result<u64, ApiError> {
    let window_hours = state.settings.notifications.interval_hours;
    let store = Arc::clone(&state.store);
    let generated =
        tokio::task::spawn_blocking(move || store.generate_upcoming_notifications(window_hours))
            .await
            .map_err(|e| ApiError::Internal(format!("notification task failed: {e}")))??;
    counter!(NOTIFICATIONS_GENERATED_TOTAL).increment(generated);
    Ok(generated)
}

/// Periodic driver; runs until the shutdown token fires.
///
/// A failed pass is logged and retried on the next tick — the job is
/// idempotent, so the next run covers the same window again.
pub async fn run_notifier(state: Arc<AppState>) {
    let hours = state.settings.notifications.interval_hours;
    let mut ticker = tokio::time::interval(Duration::from_secs(u64::from(hours) * 3600));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval's first tick completes immediately; consume it so the first
    // pass happens one full interval after startup.
    let _ = ticker.tick().await;

    loop {
        tokio::select! {
            () = state.shutdown.cancelled() => break,
            _ = ticker.tick() => match generate_now(&state).await {
                Ok(generated) => info!(generated, "notification job completed"),
                Err(e) => warn!(error = %e, "notification job failed"),
            },
        }
    }
    info!("notification job stopped");
}
