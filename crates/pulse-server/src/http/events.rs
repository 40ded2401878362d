//! Event ingestion and listing.
//!
//! Ingestion order is fixed: authenticate → validate → persist → broadcast.
//! A failure at any step stops the chain, so a broadcast can only ever
//! describe an event that was durably stored.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use metrics::counter;
use serde::Serialize;
use tracing::info;

use pulse_core::events::{BroadcastEvent, EventRecord, NewEvent};
use pulse_core::ids::{EventId, UserId};

use crate::error::ApiError;
use crate::http::authenticate;
use crate::metrics::EVENTS_CREATED_TOTAL;
use crate::state::AppState;

/// Stored attributes of a created event, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct EventData {
    /// Event title.
    pub title: String,
    /// Optional description (`null` when absent).
    pub description: Option<String>,
    /// Owning user.
    pub user_id: UserId,
    /// UTC creation timestamp.
    pub created_at: String,
}

/// Response body of `POST /events/`.
#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    /// Store-assigned identifier.
    pub id: EventId,
    /// The stored attributes.
    pub data: EventData,
}

impl From<EventRecord> for CreateEventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id,
            data: EventData {
                title: record.title,
                description: record.description,
                user_id: record.user_id,
                created_at: record.created_at,
            },
        }
    }
}

/// `POST /events/` — create one event and fan it out to live subscribers.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<NewEvent>,
) -> Result<Json<CreateEventResponse>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    input.validate()?;

    let record = {
        let store = Arc::clone(&state.store);
        let user_id = user_id.clone();
        tokio::task::spawn_blocking(move || store.create_event(&user_id, &input))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))??
    };
    counter!(EVENTS_CREATED_TOTAL).increment(1);
    info!(event_id = %record.id, user_id = %user_id, "event created");

    // Only a durably stored event reaches this point.
    state
        .broadcaster
        .broadcast(&BroadcastEvent::event_created(&record))
        .await;

    Ok(Json(record.into()))
}

/// `GET /events/` — the caller's stored events.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;

    let store = Arc::clone(&state.store);
    let records = tokio::task::spawn_blocking(move || store.list_events(&user_id))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))??;
    Ok(Json(records))
}
