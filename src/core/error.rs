use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("provider error: {0}")]
    Provider(String),

    /// Quota / 429 signal from an external provider. Arms the tactics
    /// backoff window instead of surfacing to the player.
    #[error("provider rate limited")]
    RateLimited,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("settings file error: {0}")]
    SettingsFile(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
