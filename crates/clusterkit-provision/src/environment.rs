//! Team environment provisioning from per-team config files.
//!
//! Layout under the config root:
//!
//! ```text
//! <config_dir>/<team>/single_node_cluster_config.json
//! <config_dir>/<team>/multi_node_cluster_config.json
//! <config_dir>/<team>/policy_definition.json
//! ```

use std::path::{Path, PathBuf};

use clusterkit_client::{ClusterDetails, WorkspaceApi};
use clusterkit_core::{PolicyDefinition, Team, load_json_object};
use tracing::{error, info};

use crate::cluster::create_cluster;
use crate::error::ProvisionResult;

pub const DEFAULT_CONFIG_DIR: &str = "json_files";

const MULTI_NODE_CONFIG: &str = "multi_node_cluster_config.json";
const SINGLE_NODE_CONFIG: &str = "single_node_cluster_config.json";
const POLICY_DEFINITION: &str = "policy_definition.json";

/// Paths of the two files one provisioning run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    pub cluster_config: PathBuf,
    pub policy_definition: PathBuf,
}

impl ConfigFiles {
    pub fn locate(config_dir: &Path, team: Team, multi_node: bool) -> Self {
        let team_dir = config_dir.join(team.as_str());
        let cluster_file = if multi_node {
            MULTI_NODE_CONFIG
        } else {
            SINGLE_NODE_CONFIG
        };
        Self {
            cluster_config: team_dir.join(cluster_file),
            policy_definition: team_dir.join(POLICY_DEFINITION),
        }
    }
}

/// Load the team's config files and create its cluster.
///
/// Both files are read before anything is sent to the workspace.
pub async fn create_environment<A>(
    api: &A,
    team: Team,
    config_dir: &Path,
    multi_node: bool,
) -> ProvisionResult<ClusterDetails>
where
    A: WorkspaceApi + ?Sized,
{
    let files = ConfigFiles::locate(config_dir, team, multi_node);
    let result = provision(api, &files, multi_node).await;
    match &result {
        Ok(details) => info!(
            team = %team,
            cluster_id = %details.cluster_id,
            "{} environment created successfully.",
            team.display_name()
        ),
        Err(e) => error!(
            team = %team,
            error = %e,
            "an error occurred while creating the {} environment",
            team.display_name()
        ),
    }
    result
}

async fn provision<A>(api: &A, files: &ConfigFiles, multi_node: bool) -> ProvisionResult<ClusterDetails>
where
    A: WorkspaceApi + ?Sized,
{
    let cluster_config = load_json_object(&files.cluster_config)?;
    let policy_definition = PolicyDefinition::new(load_json_object(&files.policy_definition)?);
    create_cluster(api, &cluster_config, &policy_definition, multi_node).await
}
