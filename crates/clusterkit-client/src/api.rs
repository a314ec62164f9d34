//! The remote service boundary.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::*;

/// Cluster-management operations exposed by a workspace.
///
/// Every method is one request/response exchange, except
/// [`create_cluster`](WorkspaceApi::create_cluster), which returns only
/// once the new cluster is running.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// List every cluster policy in the workspace.
    async fn list_policies(&self) -> ApiResult<Vec<Policy>>;

    /// Create a cluster policy.
    async fn create_policy(&self, request: &CreatePolicy) -> ApiResult<CreatePolicyResponse>;

    /// Create a cluster and wait until it reaches `RUNNING`.
    async fn create_cluster(&self, request: &CreateCluster) -> ApiResult<ClusterDetails>;

    /// List clusters known to the workspace.
    async fn list_clusters(&self) -> ApiResult<Vec<ClusterDetails>>;

    /// Terminate a cluster.
    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<()>;

    /// Install libraries on a cluster.
    async fn install_libraries(&self, request: &InstallLibraries) -> ApiResult<()>;
}
