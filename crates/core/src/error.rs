//! Error types for antdroid
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for antdroid core operations
#[derive(Error, Debug)]
pub enum AntdroidError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for antdroid core operations
pub type Result<T> = std::result::Result<T, AntdroidError>;
