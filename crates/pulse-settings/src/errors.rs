//! Settings error types.

/// Errors raised while loading or parsing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON or has the wrong shape.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, SettingsError>;
