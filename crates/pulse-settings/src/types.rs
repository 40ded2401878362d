//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial JSON file deserializes cleanly — missing fields get their
//! compiled default values.

use serde::{Deserialize, Serialize};

/// Root settings type for the Pulse backend.
///
/// # JSON Format
///
/// All field names are camelCase. Example:
///
/// ```json
/// {
///   "version": "0.1.0",
///   "server": { "port": 8080 },
///   "auth": { "verifyUrl": "http://localhost:9099/verify" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PulseSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// HTTP/WebSocket server settings.
    pub server: ServerSettings,
    /// SQLite database settings.
    pub database: DatabaseSettings,
    /// Identity-provider settings.
    pub auth: AuthSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Background notification job settings.
    pub notifications: NotificationSettings,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "pulse".to_string(),
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            auth: AuthSettings::default(),
            logging: LoggingSettings::default(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl PulseSettings {
    /// Correct invalid values in place rather than rejecting the file.
    ///
    /// Called automatically during loading. Out-of-range values are clamped
    /// with a warning so users get corrected behavior instead of a startup
    /// failure.
    pub fn validate(&mut self) {
        if self.server.port == 0 {
            tracing::warn!("server.port 0 is not routable, using default 8080");
            self.server.port = ServerSettings::default().port;
        }
        if self.auth.timeout_ms == 0 {
            let default = AuthSettings::default().timeout_ms;
            tracing::warn!("auth.timeoutMs 0 would never complete, using default {default}");
            self.auth.timeout_ms = default;
        }
        if self.server.connection_queue_depth == 0 {
            let default = ServerSettings::default().connection_queue_depth;
            tracing::warn!(
                "server.connectionQueueDepth 0 drops every broadcast, using default {default}"
            );
            self.server.connection_queue_depth = default;
        }
        if self.notifications.interval_hours == 0 {
            let default = NotificationSettings::default().interval_hours;
            tracing::warn!(
                "notifications.intervalHours 0 would spin the job, using default {default}"
            );
            self.notifications.interval_hours = default;
        }
    }
}

/// Server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Whether to attach a permissive CORS layer.
    pub cors_enabled: bool,
    /// Per-connection outbound queue capacity. A full queue means the
    /// message is dropped for that recipient (best-effort delivery).
    pub connection_queue_depth: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_enabled: false,
            connection_queue_depth: 64,
        }
    }
}

/// SQLite database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "pulse.db".to_string(),
        }
    }
}

/// Identity-provider settings.
///
/// Pulse never verifies credentials itself; it posts the bearer token to
/// `verify_url` and trusts the returned identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Token verification endpoint of the identity provider.
    pub verify_url: String,
    /// Verification request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            verify_url: "http://127.0.0.1:9099/v1/tokens:verify".to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Background notification job settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Hours between generation runs. Each run covers the events created
    /// within the same window, so consecutive runs leave no gap.
    pub interval_hours: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter, overridable by `PULSE_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let s = PulseSettings::default();
        assert_eq!(s.server.port, 8080);
        assert_eq!(s.database.path, "pulse.db");
        assert!(s.auth.timeout_ms > 0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let s: PulseSettings = serde_json::from_str(r#"{"server":{"port":9000}}"#).unwrap();
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.server.host, "127.0.0.1");
        assert_eq!(s.name, "pulse");
    }

    #[test]
    fn camel_case_wire_names() {
        let json = serde_json::to_value(PulseSettings::default()).unwrap();
        assert!(json["auth"].get("verifyUrl").is_some());
        assert!(json["auth"].get("timeoutMs").is_some());
        assert!(json["server"].get("corsEnabled").is_some());
        assert!(json["notifications"].get("intervalHours").is_some());
    }

    #[test]
    fn validate_corrects_zero_values() {
        let mut s = PulseSettings::default();
        s.server.port = 0;
        s.auth.timeout_ms = 0;
        s.server.connection_queue_depth = 0;
        s.notifications.interval_hours = 0;
        s.validate();
        assert_eq!(s.server.port, 8080);
        assert_eq!(s.auth.timeout_ms, 5_000);
        assert_eq!(s.server.connection_queue_depth, 64);
        assert_eq!(s.notifications.interval_hours, 24);
    }
}
