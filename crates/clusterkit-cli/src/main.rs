use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clusterkit_client::WorkspaceClient;
use clusterkit_core::{ClientConfig, Team};
use clusterkit_provision::DEFAULT_CONFIG_DIR;
use tracing::info;

mod commands;

use commands::Action;

#[derive(Parser)]
#[command(
    name = "clusterkit",
    about = "Provision policy-governed clusters in a team's Databricks workspace",
    version
)]
struct Cli {
    /// Team name (ds or mle)
    team: Team,

    /// Use the multi-node cluster config with autoscaling
    #[arg(long, alias = "multi_node_enabled")]
    multi_node_enabled: bool,

    /// Root directory holding one config directory per team
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// PyPI package to install on the new cluster (repeatable)
    #[arg(long = "install-library", value_name = "PACKAGE")]
    install_library: Vec<String>,

    /// List the workspace's clusters instead of provisioning
    #[arg(long, conflicts_with_all = ["terminate", "install_library", "multi_node_enabled"])]
    list_clusters: bool,

    /// Terminate a cluster instead of provisioning
    #[arg(long, value_name = "CLUSTER_ID", conflicts_with_all = ["install_library", "multi_node_enabled"])]
    terminate: Option<String>,
}

impl Cli {
    fn action(self) -> Action {
        if self.list_clusters {
            Action::ListClusters
        } else if let Some(cluster_id) = self.terminate {
            Action::Terminate { cluster_id }
        } else {
            Action::Provision {
                team: self.team,
                config_dir: self.config_dir,
                multi_node: self.multi_node_enabled,
                libraries: self.install_library,
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clusterkit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let team = cli.team;

    let config = ClientConfig::from_env(team)
        .with_context(|| format!("failed to resolve workspace settings for team {team}"))?;
    info!(%team, host = %config.host, "workspace settings resolved");

    let client = WorkspaceClient::new(&config).context("failed to build workspace client")?;
    commands::run(&client, cli.action()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["clusterkit", "ds"]).unwrap();
        match cli.action() {
            Action::Provision {
                team,
                config_dir,
                multi_node,
                libraries,
            } => {
                assert_eq!(team, Team::Ds);
                assert_eq!(config_dir, PathBuf::from("json_files"));
                assert!(!multi_node);
                assert!(libraries.is_empty());
            }
            _ => panic!("expected provision"),
        }
    }

    #[test]
    fn test_parse_multi_node_alias() {
        let cli = Cli::try_parse_from(["clusterkit", "mle", "--multi_node_enabled"]).unwrap();
        assert!(cli.multi_node_enabled);
        let cli = Cli::try_parse_from(["clusterkit", "mle", "--multi-node-enabled"]).unwrap();
        assert!(cli.multi_node_enabled);
    }

    #[test]
    fn test_parse_rejects_unknown_team() {
        assert!(Cli::try_parse_from(["clusterkit", "ops"]).is_err());
    }

    #[test]
    fn test_parse_repeated_libraries() {
        let cli = Cli::try_parse_from([
            "clusterkit",
            "ds",
            "--install-library",
            "requests",
            "--install-library",
            "pandas",
        ])
        .unwrap();
        assert_eq!(cli.install_library, vec!["requests", "pandas"]);
    }

    #[test]
    fn test_parse_lifecycle_flags() {
        let cli = Cli::try_parse_from(["clusterkit", "ds", "--list-clusters"]).unwrap();
        assert!(matches!(cli.action(), Action::ListClusters));

        let cli = Cli::try_parse_from(["clusterkit", "ds", "--terminate", "c-1"]).unwrap();
        assert!(matches!(cli.action(), Action::Terminate { cluster_id } if cluster_id == "c-1"));

        assert!(
            Cli::try_parse_from(["clusterkit", "ds", "--list-clusters", "--terminate", "c-1"])
                .is_err()
        );
    }
}
