//! Settings loading: defaults → file → environment.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::PulseSettings;

/// Default settings file location: `~/.pulse/settings.json`.
pub fn settings_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or(SettingsError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(".pulse").join("settings.json"))
}

/// Load settings from the default path with env overrides applied.
///
/// A missing file is not an error — defaults are used. A present but
/// malformed file is an error, so typos never silently vanish.
pub fn load_settings() -> Result<PulseSettings> {
    load_settings_from_path(&settings_path()?)
}

/// Load settings from a specific file path with env overrides applied.
pub fn load_settings_from_path(path: &Path) -> Result<PulseSettings> {
    let mut merged = serde_json::to_value(PulseSettings::default())?;

    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let file_value: Value = serde_json::from_str(&raw)?;
            deep_merge(&mut merged, file_value);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(?path, "no settings file, using defaults");
        }
        Err(e) => return Err(SettingsError::Io(e)),
    }

    let mut settings: PulseSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.validate();
    Ok(settings)
}

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key-by-key; any other value (including `null`) replaces
/// the base value wholesale.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        let _ = base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

/// Apply `PULSE_*` environment overrides.
///
/// Takes the lookup as a closure so tests can inject values without
/// mutating process-global environment state.
fn apply_env_overrides(
    settings: &mut PulseSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(host) = lookup("PULSE_SERVER_HOST") {
        settings.server.host = host;
    }
    if let Some(port) = lookup("PULSE_SERVER_PORT") {
        match port.parse() {
            Ok(p) => settings.server.port = p,
            Err(_) => tracing::warn!(value = %port, "ignoring non-numeric PULSE_SERVER_PORT"),
        }
    }
    if let Some(path) = lookup("PULSE_DATABASE_PATH") {
        settings.database.path = path;
    }
    if let Some(url) = lookup("PULSE_AUTH_VERIFY_URL") {
        settings.auth.verify_url = url;
    }
    if let Some(timeout) = lookup("PULSE_AUTH_TIMEOUT_MS") {
        match timeout.parse() {
            Ok(t) => settings.auth.timeout_ms = t,
            Err(_) => {
                tracing::warn!(value = %timeout, "ignoring non-numeric PULSE_AUTH_TIMEOUT_MS");
            }
        }
    }
    if let Some(level) = lookup("PULSE_LOG_LEVEL") {
        settings.logging.level = level;
    }
    if let Some(hours) = lookup("PULSE_NOTIFICATIONS_INTERVAL_HOURS") {
        match hours.parse() {
            Ok(h) => settings.notifications.interval_hours = h,
            Err(_) => {
                tracing::warn!(
                    value = %hours,
                    "ignoring non-numeric PULSE_NOTIFICATIONS_INTERVAL_HOURS"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn file_layer_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{"server":{{"port":9000}},"auth":{{"verifyUrl":"http://idp.local/verify"}}}}"#
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.auth.verify_url, "http://idp.local/verify");
        // untouched keys keep their defaults
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.auth.timeout_ms, 5_000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn env_overrides_win_over_everything() {
        let mut settings = PulseSettings::default();
        apply_env_overrides(&mut settings, |key| match key {
            "PULSE_SERVER_PORT" => Some("7777".into()),
            "PULSE_DATABASE_PATH" => Some("/tmp/other.db".into()),
            "PULSE_LOG_LEVEL" => Some("debug".into()),
            "PULSE_NOTIFICATIONS_INTERVAL_HOURS" => Some("6".into()),
            _ => None,
        });
        assert_eq!(settings.server.port, 7777);
        assert_eq!(settings.database.path, "/tmp/other.db");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.notifications.interval_hours, 6);
    }

    #[test]
    fn non_numeric_env_port_is_ignored() {
        let mut settings = PulseSettings::default();
        apply_env_overrides(&mut settings, |key| match key {
            "PULSE_SERVER_PORT" => Some("not-a-port".into()),
            _ => None,
        });
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn deep_merge_replaces_scalars_and_merges_objects() {
        let mut base = serde_json::json!({"a": {"x": 1, "y": 2}, "b": 3});
        deep_merge(&mut base, serde_json::json!({"a": {"y": 9}, "c": 4}));
        assert_eq!(base, serde_json::json!({"a": {"x": 1, "y": 9}, "b": 3, "c": 4}));
    }
}
