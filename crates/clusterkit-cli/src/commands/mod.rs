pub mod clusters;
pub mod provision;

use std::path::PathBuf;

use clusterkit_client::WorkspaceApi;
use clusterkit_core::Team;

/// What one invocation does.
pub enum Action {
    Provision {
        team: Team,
        config_dir: PathBuf,
        multi_node: bool,
        libraries: Vec<String>,
    },
    ListClusters,
    Terminate {
        cluster_id: String,
    },
}

pub async fn run<A>(api: &A, action: Action) -> anyhow::Result<()>
where
    A: WorkspaceApi + ?Sized,
{
    match action {
        Action::Provision {
            team,
            config_dir,
            multi_node,
            libraries,
        } => provision::provision(api, team, &config_dir, multi_node, &libraries).await,
        Action::ListClusters => clusters::list(api).await,
        Action::Terminate { cluster_id } => clusters::terminate(api, &cluster_id).await,
    }
}
