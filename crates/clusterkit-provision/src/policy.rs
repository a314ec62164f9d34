//! Policy find-or-create.

use clusterkit_client::{CreatePolicy, WorkspaceApi};
use clusterkit_core::PolicyDefinition;
use tracing::{debug, error, info, warn};

use crate::error::ProvisionResult;

/// Return the id of the policy named `name`, creating it from
/// `definition` if no policy by that name exists.
///
/// Matching is by name only. The first policy with that name wins and is
/// reused even if its definition differs from `definition`; a drift is
/// logged as a warning.
pub async fn resolve_policy<A>(
    api: &A,
    name: &str,
    definition: &PolicyDefinition,
) -> ProvisionResult<String>
where
    A: WorkspaceApi + ?Sized,
{
    let policies = api.list_policies().await.inspect_err(|e| {
        error!(policy = %name, error = %e, "failed to list cluster policies");
    })?;
    debug!(count = policies.len(), "cluster policies listed");

    if let Some(existing) = policies.iter().find(|p| p.name == name) {
        info!(policy = %existing.name, policy_id = %existing.policy_id, "policy already exists");
        if let Some(remote) = existing.definition.as_deref() {
            let wanted = definition.digest()?;
            if PolicyDefinition::digest_of_str(remote).as_deref() != Some(wanted.as_str()) {
                warn!(
                    policy = %existing.name,
                    policy_id = %existing.policy_id,
                    "existing policy definition differs from the local one, reusing it unchanged"
                );
            }
        }
        return Ok(existing.policy_id.clone());
    }

    let request = CreatePolicy {
        name: name.to_string(),
        definition: definition.to_json_string()?,
    };
    let created = api.create_policy(&request).await.inspect_err(|e| {
        error!(policy = %name, error = %e, "failed to create cluster policy");
    })?;
    info!(policy = %name, policy_id = %created.policy_id, "policy created");
    Ok(created.policy_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkit_client::{InMemoryWorkspace, Operation, Policy};
    use serde_json::json;

    fn definition() -> PolicyDefinition {
        match json!({"spark_version": {"type": "fixed", "value": "13.3.x"}}) {
            serde_json::Value::Object(map) => PolicyDefinition::new(map),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_creates_once_then_reuses() {
        let ws = InMemoryWorkspace::new();
        let first = resolve_policy(&ws, "etl-policy", &definition()).await.unwrap();
        let second = resolve_policy(&ws, "etl-policy", &definition()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(ws.call_count(Operation::CreatePolicy), 1);
        assert_eq!(ws.call_count(Operation::ListPolicies), 2);
        assert_eq!(
            ws.policy_requests()[0].definition,
            r#"{"spark_version":{"type":"fixed","value":"13.3.x"}}"#
        );
    }

    #[tokio::test]
    async fn test_first_name_match_wins() {
        let ws = InMemoryWorkspace::new()
            .with_policy(Policy {
                policy_id: "p-a".into(),
                name: "dup".into(),
                definition: None,
            })
            .with_policy(Policy {
                policy_id: "p-b".into(),
                name: "dup".into(),
                definition: None,
            });
        let id = resolve_policy(&ws, "dup", &definition()).await.unwrap();
        assert_eq!(id, "p-a");
        assert_eq!(ws.call_count(Operation::CreatePolicy), 0);
    }

    #[tokio::test]
    async fn test_divergent_definition_is_reused() {
        let ws = InMemoryWorkspace::new().with_policy(Policy {
            policy_id: "p-old".into(),
            name: "etl-policy".into(),
            definition: Some(r#"{"node_type_id":{"type":"fixed","value":"m5.large"}}"#.into()),
        });
        let id = resolve_policy(&ws, "etl-policy", &definition()).await.unwrap();
        assert_eq!(id, "p-old");
        assert!(ws.policy_requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_propagates_without_create() {
        let ws = InMemoryWorkspace::new();
        ws.fail_on(Operation::ListPolicies);
        let err = resolve_policy(&ws, "etl-policy", &definition()).await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(ws.call_count(Operation::CreatePolicy), 0);
    }
}
