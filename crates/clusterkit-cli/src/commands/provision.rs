//! Default action: create the team's cluster, then install any requested
//! libraries on it.

use std::path::Path;

use anyhow::Context;
use clusterkit_client::WorkspaceApi;
use clusterkit_core::Team;
use clusterkit_provision::{create_environment, install_library};

pub async fn provision<A>(
    api: &A,
    team: Team,
    config_dir: &Path,
    multi_node: bool,
    libraries: &[String],
) -> anyhow::Result<()>
where
    A: WorkspaceApi + ?Sized,
{
    let details = create_environment(api, team, config_dir, multi_node)
        .await
        .with_context(|| format!("failed to create the {team} environment"))?;

    for package in libraries {
        install_library(api, &details.cluster_id, package)
            .await
            .with_context(|| {
                format!(
                    "failed to install {package} on cluster {}",
                    details.cluster_id
                )
            })?;
    }

    println!("✓ Cluster {} ({}) is running", details.cluster_name, details.cluster_id);
    Ok(())
}
