//! Error types for provisioning operations.

use clusterkit_client::ApiError;
use clusterkit_core::ConfigError;
use thiserror::Error;

/// Result type alias for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// A provisioning failure, classified by where it came from.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Bad local input: missing file, malformed JSON, missing key.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The workspace rejected or failed a call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ProvisionError {
    pub fn is_config(&self) -> bool {
        matches!(self, ProvisionError::Config(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ProvisionError::Api(_))
    }
}
