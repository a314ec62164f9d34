//! Request and response bodies for the workspace REST API.

use clusterkit_core::AutoScale;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Policies ──────────────────────────────────────────────────────

/// A cluster policy as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: String,
    pub name: String,
    /// JSON-encoded policy definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicy {
    pub name: String,
    /// JSON-encoded policy definition.
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicyResponse {
    pub policy_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListPoliciesResponse {
    #[serde(default)]
    pub policies: Vec<Policy>,
}

// ── Clusters ──────────────────────────────────────────────────────

/// Body of a cluster-creation request.
///
/// Exactly one of `autoscale` and `num_workers` is set by the provisioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCluster {
    pub cluster_name: String,
    pub spark_version: String,
    pub node_type_id: String,
    pub autotermination_minutes: u32,
    pub enable_elastic_disk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<u32>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub spark_conf: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub spark_env_vars: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_tags: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub aws_attributes: Map<String, Value>,
    pub policy_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterResponse {
    pub cluster_id: String,
}

/// Lifecycle state reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    Pending,
    Running,
    Restarting,
    Resizing,
    Terminating,
    Terminated,
    Error,
    #[serde(other)]
    Unknown,
}

impl ClusterState {
    /// States from which a cluster will not reach `RUNNING` on its own.
    pub fn is_failed(&self) -> bool {
        matches!(self, ClusterState::Terminated | ClusterState::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDetails {
    pub cluster_id: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default = "unknown_state")]
    pub state: ClusterState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
}

fn unknown_state() -> ClusterState {
    ClusterState::Unknown
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListClustersResponse {
    #[serde(default)]
    pub clusters: Vec<ClusterDetails>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteCluster<'a> {
    pub cluster_id: &'a str,
}

// ── Libraries ─────────────────────────────────────────────────────

/// A library to install on a cluster. Only PyPI packages are supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub pypi: PythonPyPiLibrary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PythonPyPiLibrary {
    pub package: String,
}

impl Library {
    pub fn pypi(package: impl Into<String>) -> Self {
        Library {
            pypi: PythonPyPiLibrary {
                package: package.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallLibraries {
    pub cluster_id: String,
    pub libraries: Vec<Library>,
}

/// Response body of calls that return `{}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Empty {}
