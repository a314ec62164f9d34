//! clusterkit-provision — cluster provisioning against a workspace.
//!
//! Every operation takes the workspace handle explicitly as
//! `&impl WorkspaceApi`; nothing here holds a global client.
//!
//! - [`resolve_policy`]: find a policy by name or create it.
//! - [`create_cluster`]: build a creation request from a cluster config and
//!   submit it under a resolved policy.
//! - [`list_clusters`], [`terminate_cluster`]: lifecycle calls.
//! - [`install_library`]: one PyPI package on one cluster.
//! - [`create_environment`]: load a team's config files and provision.

pub mod cluster;
pub mod environment;
pub mod error;
pub mod library;
pub mod lifecycle;
pub mod policy;

pub use cluster::{WorkerSizing, build_request, create_cluster, policy_name_for};
pub use environment::{ConfigFiles, DEFAULT_CONFIG_DIR, create_environment};
pub use error::{ProvisionError, ProvisionResult};
pub use library::install_library;
pub use lifecycle::{list_clusters, terminate_cluster};
pub use policy::resolve_policy;
