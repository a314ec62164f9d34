//! Listing and terminating clusters.

use clusterkit_client::WorkspaceApi;
use tracing::{error, info};

use crate::error::ProvisionResult;

/// List `(cluster_id, cluster_name)` pairs, logging each one.
pub async fn list_clusters<A>(api: &A) -> ProvisionResult<Vec<(String, String)>>
where
    A: WorkspaceApi + ?Sized,
{
    let clusters = api.list_clusters().await.inspect_err(|e| {
        error!(error = %e, "failed to list clusters");
    })?;

    let pairs = clusters
        .into_iter()
        .map(|c| {
            info!(cluster_id = %c.cluster_id, name = %c.cluster_name, state = ?c.state, "cluster");
            (c.cluster_id, c.cluster_name)
        })
        .collect::<Vec<_>>();
    info!(count = pairs.len(), "clusters listed");
    Ok(pairs)
}

/// Terminate one cluster.
pub async fn terminate_cluster<A>(api: &A, cluster_id: &str) -> ProvisionResult<()>
where
    A: WorkspaceApi + ?Sized,
{
    api.delete_cluster(cluster_id).await.inspect_err(|e| {
        error!(%cluster_id, error = %e, "failed to terminate cluster");
    })?;
    info!(%cluster_id, "cluster terminated");
    Ok(())
}
