//! `--list-clusters` and `--terminate`.

use anyhow::Context;
use clusterkit_client::WorkspaceApi;
use clusterkit_provision::{list_clusters, terminate_cluster};

pub async fn list<A>(api: &A) -> anyhow::Result<()>
where
    A: WorkspaceApi + ?Sized,
{
    let clusters = list_clusters(api).await.context("failed to list clusters")?;
    for (cluster_id, name) in &clusters {
        println!("{cluster_id}\t{name}");
    }
    Ok(())
}

pub async fn terminate<A>(api: &A, cluster_id: &str) -> anyhow::Result<()>
where
    A: WorkspaceApi + ?Sized,
{
    terminate_cluster(api, cluster_id)
        .await
        .with_context(|| format!("failed to terminate cluster {cluster_id}"))?;
    println!("✓ Cluster {cluster_id} terminated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkit_client::{ClusterDetails, ClusterState, InMemoryWorkspace, Operation};

    #[tokio::test]
    async fn test_terminate_unknown_cluster_has_context() {
        let ws = InMemoryWorkspace::new();
        let err = terminate(&ws, "c-404").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to terminate cluster c-404");
    }

    #[tokio::test]
    async fn test_list_then_terminate() {
        let ws = InMemoryWorkspace::new().with_cluster(ClusterDetails {
            cluster_id: "c-1".into(),
            cluster_name: "etl".into(),
            state: ClusterState::Running,
            state_message: None,
            policy_id: None,
        });
        list(&ws).await.unwrap();
        terminate(&ws, "c-1").await.unwrap();
        assert_eq!(
            ws.calls(),
            vec![Operation::ListClusters, Operation::DeleteCluster]
        );
    }
}
