//! Error types for the game server

use thiserror::Error;

/// Result type alias for game operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Could not write config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config parsed but describes an unplayable game
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
