//! Cluster creation under an enforced policy.

use std::time::{SystemTime, UNIX_EPOCH};

use clusterkit_client::{ClusterDetails, CreateCluster, WorkspaceApi};
use clusterkit_core::{AutoScale, ClusterConfig, ConfigError, PolicyDefinition};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::error::ProvisionResult;
use crate::policy::resolve_policy;

/// How the cluster's worker count is specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSizing {
    /// Multi-node: the service scales between the bounds.
    Autoscale(AutoScale),
    /// Single-node style: a literal worker count.
    Fixed(u32),
}

impl WorkerSizing {
    /// Pick the sizing for a config. Multi-node requires `autoscale`.
    pub fn for_config(config: &ClusterConfig, multi_node: bool) -> Result<Self, ConfigError> {
        if multi_node {
            config
                .autoscale
                .map(WorkerSizing::Autoscale)
                .ok_or_else(|| ConfigError::MissingKey {
                    key: "autoscale".to_string(),
                })
        } else {
            Ok(WorkerSizing::Fixed(config.num_workers))
        }
    }
}

/// Policy name derived from a cluster name.
pub fn policy_name_for(cluster_name: &str) -> String {
    format!("{cluster_name}-policy")
}

/// Name used when the config does not set `cluster_name`.
fn generated_cluster_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("sdk-{nanos}")
}

/// Assemble the creation request. Exactly one of `autoscale` and
/// `num_workers` ends up set, according to `sizing`.
pub fn build_request(
    config: &ClusterConfig,
    cluster_name: &str,
    sizing: WorkerSizing,
    policy_id: &str,
) -> CreateCluster {
    let (autoscale, num_workers) = match sizing {
        WorkerSizing::Autoscale(range) => (Some(range), None),
        WorkerSizing::Fixed(n) => (None, Some(n)),
    };
    CreateCluster {
        cluster_name: cluster_name.to_string(),
        spark_version: config.spark_version.clone(),
        node_type_id: config.node_type_id.clone(),
        autotermination_minutes: config.autotermination_minutes,
        enable_elastic_disk: config.enable_elastic_disk,
        autoscale,
        num_workers,
        spark_conf: config.spark_conf.clone(),
        spark_env_vars: config.spark_env_vars.clone(),
        custom_tags: config.custom_tags.clone(),
        aws_attributes: config.aws_attributes.clone(),
        policy_id: policy_id.to_string(),
    }
}

/// Create a cluster from a raw JSON config, enforcing a policy named
/// `<cluster_name>-policy` built from `policy_definition`.
///
/// The config is fully validated before the first remote call. Returns once
/// the workspace reports the cluster running.
pub async fn create_cluster<A>(
    api: &A,
    cluster_config: &Map<String, Value>,
    policy_definition: &PolicyDefinition,
    multi_node: bool,
) -> ProvisionResult<ClusterDetails>
where
    A: WorkspaceApi + ?Sized,
{
    let prepared = ClusterConfig::from_map(cluster_config).and_then(|config| {
        let sizing = WorkerSizing::for_config(&config, multi_node)?;
        Ok((config, sizing))
    });
    let (config, sizing) = prepared.inspect_err(|e| {
        error!(error = %e, "invalid cluster configuration");
    })?;

    let cluster_name = config
        .cluster_name
        .clone()
        .unwrap_or_else(generated_cluster_name);
    debug!(%cluster_name, "cluster name determined");

    let policy_name = policy_name_for(&cluster_name);
    let policy_id = resolve_policy(api, &policy_name, policy_definition).await?;

    let request = build_request(&config, &cluster_name, sizing, &policy_id);
    debug!(?request, "cluster configuration prepared");

    let details = api.create_cluster(&request).await.inspect_err(|e| {
        error!(%cluster_name, %policy_id, error = %e, "cluster creation failed");
    })?;
    info!(
        cluster_id = %details.cluster_id,
        %cluster_name,
        %policy_id,
        "cluster created"
    );
    Ok(details)
}
