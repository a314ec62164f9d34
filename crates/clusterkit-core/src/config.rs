//! JSON configuration loading and cluster-config parsing.
//!
//! Cluster configurations arrive as free-form JSON objects. Required keys
//! are checked individually so a missing or mistyped key surfaces as a
//! [`ConfigError`] naming that key, before anything touches the workspace.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::error::{ConfigError, ConfigResult};

/// Load a JSON document from disk.
pub fn load_json(path: &Path) -> ConfigResult<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(
                path = %path.display(),
                "JSON configuration file could not be found, ensure the file exists and try again"
            );
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            error!(path = %path.display(), error = %source, "failed to read JSON configuration");
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value = serde_json::from_str(&content).map_err(|source| {
        error!(path = %path.display(), error = %source, "failed to decode JSON file");
        ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "JSON configuration loaded");
    Ok(value)
}

/// Load a JSON document that must be an object at the top level.
pub fn load_json_object(path: &Path) -> ConfigResult<Map<String, Value>> {
    match load_json(path)? {
        Value::Object(map) => Ok(map),
        _ => {
            error!(path = %path.display(), "JSON configuration is not an object");
            Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            })
        }
    }
}

// ── Cluster configuration ─────────────────────────────────────────

/// Worker range handed to the service for autoscaling clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScale {
    pub min_workers: u32,
    pub max_workers: u32,
}

/// Parsed cluster configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub cluster_name: Option<String>,
    pub spark_version: String,
    pub node_type_id: String,
    pub autotermination_minutes: u32,
    pub enable_elastic_disk: bool,
    pub num_workers: u32,
    pub autoscale: Option<AutoScale>,
    pub spark_conf: Map<String, Value>,
    pub spark_env_vars: Map<String, Value>,
    pub custom_tags: Map<String, Value>,
    pub aws_attributes: Map<String, Value>,
}

impl ClusterConfig {
    /// Parse a cluster configuration from a JSON object.
    ///
    /// Required keys: `spark_version`, `node_type_id`,
    /// `autotermination_minutes`, `enable_elastic_disk`, `num_workers`.
    /// Everything else is optional and defaults to absent or empty.
    pub fn from_map(map: &Map<String, Value>) -> ConfigResult<Self> {
        Ok(Self {
            cluster_name: optional_str(map, "cluster_name")?,
            spark_version: required_str(map, "spark_version")?,
            node_type_id: required_str(map, "node_type_id")?,
            autotermination_minutes: required_u32(map, "autotermination_minutes")?,
            enable_elastic_disk: required_bool(map, "enable_elastic_disk")?,
            num_workers: required_u32(map, "num_workers")?,
            autoscale: optional_autoscale(map)?,
            spark_conf: optional_object(map, "spark_conf")?,
            spark_env_vars: optional_object(map, "spark_env_vars")?,
            custom_tags: optional_object(map, "custom_tags")?,
            aws_attributes: optional_object(map, "aws_attributes")?,
        })
    }
}

fn required<'a>(map: &'a Map<String, Value>, key: &str) -> ConfigResult<&'a Value> {
    map.get(key).ok_or_else(|| ConfigError::missing(key))
}

fn required_str(map: &Map<String, Value>, key: &str) -> ConfigResult<String> {
    required(map, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::invalid(key, "a string"))
}

fn required_u32(map: &Map<String, Value>, key: &str) -> ConfigResult<u32> {
    as_u32(required(map, key)?, key)
}

fn required_bool(map: &Map<String, Value>, key: &str) -> ConfigResult<bool> {
    required(map, key)?
        .as_bool()
        .ok_or_else(|| ConfigError::invalid(key, "a boolean"))
}

fn as_u32(value: &Value, key: &str) -> ConfigResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ConfigError::invalid(key, "a non-negative integer"))
}

fn optional_str(map: &Map<String, Value>, key: &str) -> ConfigResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::invalid(key, "a string")),
    }
}

fn optional_object(map: &Map<String, Value>, key: &str) -> ConfigResult<Map<String, Value>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(obj)) => Ok(obj.clone()),
        Some(_) => Err(ConfigError::invalid(key, "an object")),
    }
}

fn optional_autoscale(map: &Map<String, Value>) -> ConfigResult<Option<AutoScale>> {
    let obj = match map.get("autoscale") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(ConfigError::invalid("autoscale", "an object")),
    };
    let min_workers = obj
        .get("min_workers")
        .ok_or_else(|| ConfigError::missing("autoscale.min_workers"))
        .and_then(|v| as_u32(v, "autoscale.min_workers"))?;
    let max_workers = obj
        .get("max_workers")
        .ok_or_else(|| ConfigError::missing("autoscale.max_workers"))
        .and_then(|v| as_u32(v, "autoscale.max_workers"))?;
    Ok(Some(AutoScale {
        min_workers,
        max_workers,
    }))
}

// ── Policy definition ─────────────────────────────────────────────

/// A cluster policy definition: an arbitrary JSON object submitted to
/// the service as a serialized string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyDefinition(Map<String, Value>);

impl PolicyDefinition {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize to the JSON string form the policy API expects.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Hex SHA-256 of the canonical (key-sorted) JSON form.
    pub fn digest(&self) -> ConfigResult<String> {
        let canonical = serde_json::to_string(&self.0)?;
        Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
    }

    /// Digest of a definition as returned by the service, or `None` if the
    /// string is not a JSON object.
    pub fn digest_of_str(definition: &str) -> Option<String> {
        match serde_json::from_str::<Value>(definition).ok()? {
            Value::Object(map) => PolicyDefinition(map).digest().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for PolicyDefinition {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
