//! Bearer-credential extraction and identity verification.
//!
//! Pulse never inspects credentials itself. The bearer token is forwarded
//! to the identity provider's verify endpoint, which either returns the
//! caller's opaque `uid` or rejects it. Any failure — missing header, bad
//! token, provider outage — rejects the request with an unauthorized
//! outcome and no side effects. No retry.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::warn;

use pulse_core::ids::UserId;
use pulse_settings::AuthSettings;

/// Authentication failures. All map to HTTP 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header on the request.
    #[error("missing or invalid Authorization header")]
    MissingCredentials,

    /// The identity provider rejected the token.
    #[error("token verification failed")]
    InvalidToken,

    /// The identity provider could not be reached or answered garbage.
    #[error("identity provider unavailable")]
    ProviderUnavailable,
}

/// Verifies a bearer token and resolves the caller's identity.
///
/// The one seam between the request path and the external identity
/// provider; tests substitute a stub implementation.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve `token` to a caller identity, or reject it.
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Pull the bearer token out of the request headers.
///
/// The scheme prefix is matched exactly (`Bearer `), like the surface this
/// backend replaces.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)?;
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

#[derive(Deserialize)]
struct VerifyResponse {
    uid: String,
}

/// Production verifier: posts the token to the provider's verify endpoint.
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpIdentityVerifier {
    /// Build a verifier from auth settings.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            verify_url: settings.verify_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "identity provider request failed");
                AuthError::ProviderUnavailable
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            warn!(status = %status, "identity provider returned server error");
            return Err(AuthError::ProviderUnavailable);
        }

        let body: VerifyResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "identity provider response was not parseable");
            AuthError::ProviderUnavailable
        })?;
        Ok(UserId::new(body.uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_requires_the_header() {
        assert_matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn bearer_token_requires_the_scheme() {
        assert_matches!(
            bearer_token(&headers_with("Basic dXNlcjpwdw==")),
            Err(AuthError::MissingCredentials)
        );
        assert_matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn bearer_token_extracts_the_credential() {
        assert_eq!(bearer_token(&headers_with("Bearer tok-123")).unwrap(), "tok-123");
    }

    fn verifier_for(server: &MockServer) -> HttpIdentityVerifier {
        HttpIdentityVerifier::from_settings(&AuthSettings {
            verify_url: format!("{}/verify", server.uri()),
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn verify_resolves_uid_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .and(body_json(serde_json::json!({ "token": "tok-u1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uid": "U1"
            })))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server);
        assert_eq!(verifier.verify("tok-u1").await.unwrap(), UserId::new("U1"));
    }

    #[tokio::test]
    async fn verify_maps_rejection_to_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server);
        assert_matches!(verifier.verify("expired").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn verify_maps_outage_to_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server);
        assert_matches!(
            verifier.verify("tok").await,
            Err(AuthError::ProviderUnavailable)
        );
    }

    #[tokio::test]
    async fn verify_maps_garbage_body_to_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server);
        assert_matches!(
            verifier.verify("tok").await,
            Err(AuthError::ProviderUnavailable)
        );
    }
}
