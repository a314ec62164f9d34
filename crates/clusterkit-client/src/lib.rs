//! clusterkit-client — access to a workspace's cluster-management API.
//!
//! The [`WorkspaceApi`] trait is the boundary to the remote service. Two
//! implementations ship here:
//!
//! - [`WorkspaceClient`]: REST over HTTPS with OAuth client-credentials
//!   authentication.
//! - [`InMemoryWorkspace`]: a process-local workspace that records every
//!   call, used by tests and dry runs.

pub mod api;
pub mod error;
pub mod memory;
pub mod rest;
pub mod types;

pub use api::WorkspaceApi;
pub use error::{ApiError, ApiResult};
pub use memory::{InMemoryWorkspace, Operation};
pub use rest::{WaitOptions, WorkspaceClient};
pub use types::*;
