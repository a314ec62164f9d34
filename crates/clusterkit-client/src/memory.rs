//! Process-local [`WorkspaceApi`] implementation.
//!
//! Keeps policies and clusters in memory, records every call in order, and
//! can be told to fail specific operations. Clusters come up `RUNNING`
//! immediately. Policy names are unique, as the real service enforces.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::api::WorkspaceApi;
use crate::error::{ApiError, ApiResult};
use crate::types::*;

/// One kind of call against the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPolicies,
    CreatePolicy,
    CreateCluster,
    ListClusters,
    DeleteCluster,
    InstallLibraries,
}

#[derive(Default)]
struct Inner {
    policies: Vec<Policy>,
    clusters: Vec<ClusterDetails>,
    calls: Vec<Operation>,
    cluster_requests: Vec<CreateCluster>,
    policy_requests: Vec<CreatePolicy>,
    installs: Vec<InstallLibraries>,
    failing: HashSet<Operation>,
    next_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory workspace.
#[derive(Default)]
pub struct InMemoryWorkspace {
    inner: Mutex<Inner>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing policy.
    pub fn with_policy(self, policy: Policy) -> Self {
        self.state().policies.push(policy);
        self
    }

    /// Seed an existing cluster.
    pub fn with_cluster(self, cluster: ClusterDetails) -> Self {
        self.state().clusters.push(cluster);
        self
    }

    /// Make every subsequent call of `operation` fail with a 500.
    pub fn fail_on(&self, operation: Operation) {
        self.state().failing.insert(operation);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.state().calls.clone()
    }

    /// Number of calls made of one kind.
    pub fn call_count(&self, operation: Operation) -> usize {
        self.state().calls.iter().filter(|c| **c == operation).count()
    }

    pub fn policies(&self) -> Vec<Policy> {
        self.state().policies.clone()
    }

    pub fn clusters(&self) -> Vec<ClusterDetails> {
        self.state().clusters.clone()
    }

    /// Cluster-creation requests received, including failed ones.
    pub fn cluster_requests(&self) -> Vec<CreateCluster> {
        self.state().cluster_requests.clone()
    }

    /// Policy-creation requests received, including failed ones.
    pub fn policy_requests(&self) -> Vec<CreatePolicy> {
        self.state().policy_requests.clone()
    }

    pub fn installs(&self) -> Vec<InstallLibraries> {
        self.state().installs.clone()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a call and return the injected failure, if any.
    fn record(&self, operation: Operation) -> ApiResult<MutexGuard<'_, Inner>> {
        let mut state = self.state();
        state.calls.push(operation);
        if state.failing.contains(&operation) {
            return Err(ApiError::Status {
                status: 500,
                error_code: "INTERNAL_ERROR".to_string(),
                message: format!("injected failure for {operation:?}"),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl WorkspaceApi for InMemoryWorkspace {
    async fn list_policies(&self) -> ApiResult<Vec<Policy>> {
        let state = self.record(Operation::ListPolicies)?;
        Ok(state.policies.clone())
    }

    async fn create_policy(&self, request: &CreatePolicy) -> ApiResult<CreatePolicyResponse> {
        self.state().policy_requests.push(request.clone());
        let mut state = self.record(Operation::CreatePolicy)?;
        if state.policies.iter().any(|p| p.name == request.name) {
            return Err(ApiError::Status {
                status: 400,
                error_code: "INVALID_PARAMETER_VALUE".to_string(),
                message: format!("Policy with name {} already exists", request.name),
            });
        }
        let policy_id = format!("policy-{:04}", state.next_id());
        state.policies.push(Policy {
            policy_id: policy_id.clone(),
            name: request.name.clone(),
            definition: Some(request.definition.clone()),
        });
        debug!(%policy_id, name = %request.name, "in-memory policy created");
        Ok(CreatePolicyResponse { policy_id })
    }

    async fn create_cluster(&self, request: &CreateCluster) -> ApiResult<ClusterDetails> {
        self.state().cluster_requests.push(request.clone());
        let mut state = self.record(Operation::CreateCluster)?;
        let details = ClusterDetails {
            cluster_id: format!("cluster-{:04}", state.next_id()),
            cluster_name: request.cluster_name.clone(),
            state: ClusterState::Running,
            state_message: None,
            policy_id: Some(request.policy_id.clone()),
        };
        state.clusters.push(details.clone());
        debug!(cluster_id = %details.cluster_id, "in-memory cluster created");
        Ok(details)
    }

    async fn list_clusters(&self) -> ApiResult<Vec<ClusterDetails>> {
        let state = self.record(Operation::ListClusters)?;
        Ok(state.clusters.clone())
    }

    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<()> {
        let mut state = self.record(Operation::DeleteCluster)?;
        let cluster = state
            .clusters
            .iter_mut()
            .find(|c| c.cluster_id == cluster_id)
            .ok_or_else(|| ApiError::NotFound(format!("cluster {cluster_id}")))?;
        cluster.state = ClusterState::Terminated;
        Ok(())
    }

    async fn install_libraries(&self, request: &InstallLibraries) -> ApiResult<()> {
        let mut state = self.record(Operation::InstallLibraries)?;
        if !state.clusters.iter().any(|c| c.cluster_id == request.cluster_id) {
            return Err(ApiError::NotFound(format!("cluster {}", request.cluster_id)));
        }
        state.installs.push(request.clone());
        Ok(())
    }
}
