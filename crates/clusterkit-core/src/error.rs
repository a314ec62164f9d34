//! Error types for configuration loading and resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object at the top level of {}", path.display())]
    NotAnObject { path: PathBuf },

    #[error("missing required key: {key}")]
    MissingKey { key: String },

    #[error("invalid value for key {key}: expected {expected}")]
    InvalidKey { key: String, expected: &'static str },

    #[error("environment variable {name} is not set")]
    MissingEnv { name: String },

    #[error("invalid team name: {name}. Expected 'ds' or 'mle'")]
    InvalidTeam { name: String },

    #[error("failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn missing(key: &str) -> Self {
        ConfigError::MissingKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(key: &str, expected: &'static str) -> Self {
        ConfigError::InvalidKey {
            key: key.to_string(),
            expected,
        }
    }
}
