//! End-to-end provisioning scenarios against an in-memory workspace.

use std::fs;
use std::path::Path;

use clusterkit_client::{InMemoryWorkspace, Operation, Policy};
use clusterkit_core::{AutoScale, ConfigError, PolicyDefinition, Team};
use clusterkit_provision::*;
use serde_json::{Map, Value, json};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn test_config() -> Map<String, Value> {
    object(json!({
        "cluster_name": "test",
        "spark_version": "13.3.x",
        "node_type_id": "i3.xlarge",
        "autotermination_minutes": 30,
        "enable_elastic_disk": true,
        "num_workers": 2
    }))
}

fn policy() -> PolicyDefinition {
    PolicyDefinition::new(object(json!({
        "autotermination_minutes": {"type": "range", "maxValue": 120}
    })))
}

fn write_team_dir(root: &Path, team: &str, cluster_file: &str, cluster: &Value) {
    let dir = root.join(team);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(cluster_file), cluster.to_string()).unwrap();
    fs::write(
        dir.join("policy_definition.json"),
        json!({"spark_version": {"type": "fixed", "value": "13.3.x"}}).to_string(),
    )
    .unwrap();
}

#[tokio::test]
async fn single_node_scenario() {
    let ws = InMemoryWorkspace::new();
    let details = create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap();

    let policies = ws.policies();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name, "test-policy");

    let requests = ws.cluster_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].num_workers, Some(2));
    assert!(requests[0].autoscale.is_none());
    assert_eq!(requests[0].policy_id, policies[0].policy_id);
    assert_eq!(details.policy_id.as_deref(), Some(policies[0].policy_id.as_str()));

    let body = serde_json::to_value(&requests[0]).unwrap();
    assert!(body.get("autoscale").is_none());
}

#[tokio::test]
async fn multi_node_scenario() {
    let mut config = test_config();
    config.insert(
        "autoscale".to_string(),
        json!({"min_workers": 1, "max_workers": 4}),
    );

    let ws = InMemoryWorkspace::new();
    create_cluster(&ws, &config, &policy(), true).await.unwrap();

    let requests = ws.cluster_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].autoscale,
        Some(AutoScale {
            min_workers: 1,
            max_workers: 4
        })
    );
    assert!(requests[0].num_workers.is_none());

    let body = serde_json::to_value(&requests[0]).unwrap();
    assert_eq!(body["autoscale"], json!({"min_workers": 1, "max_workers": 4}));
    assert!(body.get("num_workers").is_none());
}

#[tokio::test]
async fn missing_required_field_makes_no_remote_call() {
    let mut config = test_config();
    config.remove("spark_version");

    let ws = InMemoryWorkspace::new();
    let err = create_cluster(&ws, &config, &policy(), false)
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert!(matches!(
        err,
        ProvisionError::Config(ConfigError::MissingKey { ref key }) if key == "spark_version"
    ));
    assert!(ws.calls().is_empty());
}

#[tokio::test]
async fn repeated_provisioning_reuses_policy() {
    let ws = InMemoryWorkspace::new();
    create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap();
    create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap();

    assert_eq!(ws.call_count(Operation::CreatePolicy), 1);
    assert_eq!(ws.call_count(Operation::CreateCluster), 2);
    let requests = ws.cluster_requests();
    assert_eq!(requests[0].policy_id, requests[1].policy_id);
}

#[tokio::test]
async fn existing_policy_is_not_recreated() {
    let ws = InMemoryWorkspace::new().with_policy(Policy {
        policy_id: "p-existing".to_string(),
        name: "test-policy".to_string(),
        definition: None,
    });
    create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap();

    assert_eq!(ws.call_count(Operation::CreatePolicy), 0);
    assert_eq!(ws.cluster_requests()[0].policy_id, "p-existing");
}

#[tokio::test]
async fn unnamed_cluster_gets_generated_policy_name() {
    let mut config = test_config();
    config.remove("cluster_name");

    let ws = InMemoryWorkspace::new();
    create_cluster(&ws, &config, &policy(), false).await.unwrap();

    let request = &ws.cluster_requests()[0];
    assert!(request.cluster_name.starts_with("sdk-"));
    assert_eq!(
        ws.policies()[0].name,
        format!("{}-policy", request.cluster_name)
    );
}

#[tokio::test]
async fn cluster_creation_failure_is_remote_error() {
    let ws = InMemoryWorkspace::new();
    ws.fail_on(Operation::CreateCluster);
    let err = create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap_err();

    assert!(err.is_remote());
    // The policy stays behind; nothing is rolled back.
    assert_eq!(ws.policies().len(), 1);
}

#[tokio::test]
async fn failed_install_leaves_cluster_running() {
    let ws = InMemoryWorkspace::new();
    let details = create_cluster(&ws, &test_config(), &policy(), false)
        .await
        .unwrap();

    ws.fail_on(Operation::InstallLibraries);
    let err = install_library(&ws, &details.cluster_id, "requests")
        .await
        .unwrap_err();
    assert!(err.is_remote());

    let clusters = list_clusters(&ws).await.unwrap();
    assert_eq!(clusters, vec![(details.cluster_id.clone(), "test".to_string())]);
    assert_eq!(ws.call_count(Operation::DeleteCluster), 0);
}

#[tokio::test]
async fn environment_missing_file_fails_before_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("ds")).unwrap();

    let ws = InMemoryWorkspace::new();
    let err = create_environment(&ws, Team::Ds, dir.path(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::Config(ConfigError::NotFound { .. })
    ));
    assert!(ws.calls().is_empty());
}

#[tokio::test]
async fn environment_reads_team_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut multi = Value::Object(test_config());
    multi["autoscale"] = json!({"min_workers": 2, "max_workers": 8});
    write_team_dir(dir.path(), "mle", "multi_node_cluster_config.json", &multi);

    let ws = InMemoryWorkspace::new();
    let details = create_environment(&ws, Team::Mle, dir.path(), true)
        .await
        .unwrap();

    assert_eq!(details.cluster_name, "test");
    let request = &ws.cluster_requests()[0];
    assert_eq!(
        request.autoscale,
        Some(AutoScale {
            min_workers: 2,
            max_workers: 8
        })
    );
    assert_eq!(
        ws.policy_requests()[0].definition,
        r#"{"spark_version":{"type":"fixed","value":"13.3.x"}}"#
    );
}

#[tokio::test]
async fn environment_single_node_ignores_multi_node_file() {
    let dir = tempfile::tempdir().unwrap();
    write_team_dir(
        dir.path(),
        "ds",
        "multi_node_cluster_config.json",
        &Value::Object(test_config()),
    );

    let ws = InMemoryWorkspace::new();
    let err = create_environment(&ws, Team::Ds, dir.path(), false)
        .await
        .unwrap_err();
    assert!(err.is_config());
    assert!(ws.calls().is_empty());
}
