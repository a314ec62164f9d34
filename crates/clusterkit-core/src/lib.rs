//! clusterkit-core — shared types for cluster provisioning.
//!
//! Loads the per-team JSON configuration files, parses cluster
//! configurations and policy definitions, and resolves workspace
//! credentials from the environment.

pub mod config;
pub mod error;
pub mod team;

pub use config::{AutoScale, ClusterConfig, PolicyDefinition, load_json, load_json_object};
pub use error::{ConfigError, ConfigResult};
pub use team::{ClientConfig, Team};
