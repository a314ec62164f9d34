//! Error types for remote workspace calls.

use std::time::Duration;

use thiserror::Error;

use crate::types::ClusterState;

/// Result type alias for workspace API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the remote service or the transport to it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("workspace returned {status} {error_code}: {message}")]
    Status {
        status: u16,
        error_code: String,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("cluster {cluster_id} entered state {state:?}: {message}")]
    ClusterFailed {
        cluster_id: String,
        state: ClusterState,
        message: String,
    },

    #[error("timed out after {waited:?} waiting for cluster {cluster_id} to start")]
    Timeout { cluster_id: String, waited: Duration },

    #[error("not found: {0}")]
    NotFound(String),
}
