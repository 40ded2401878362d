//! REST handlers.

pub mod analytics;
pub mod events;
pub mod health;
pub mod notifications;

use axum::http::HeaderMap;

use pulse_core::ids::UserId;

use crate::auth::{AuthError, bearer_token};
use crate::state::AppState;

/// Resolve the caller's identity from the request headers.
///
/// Shared precondition of every authenticated route; a failure here means
/// the request is rejected before it has any side effect.
pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserId, AuthError> {
    let token = bearer_token(headers)?;
    state.verifier.verify(token).await
}
