//! Team selection and workspace credential resolution.

use std::fmt;
use std::str::FromStr;

use tracing::error;

use crate::error::{ConfigError, ConfigResult};

pub const ENV_HOST_DS: &str = "DATABRICKS_HOST_WORKSPACE_DS";
pub const ENV_HOST_MLE: &str = "DATABRICKS_HOST_WORKSPACE_MLE";
pub const ENV_CLIENT_ID: &str = "DATABRICKS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "DATABRICKS_CLIENT_SECRET";
pub const ENV_ACCOUNT_ID: &str = "DATABRICKS_ACCOUNT_ID";

/// A team owns one workspace and one directory of config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Ds,
    Mle,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Ds => "ds",
            Team::Mle => "mle",
        }
    }

    /// Environment variable holding this team's workspace host.
    pub fn host_env_var(&self) -> &'static str {
        match self {
            Team::Ds => ENV_HOST_DS,
            Team::Mle => ENV_HOST_MLE,
        }
    }

    /// Capitalized name used in log lines ("Ds", "Mle").
    pub fn display_name(&self) -> &'static str {
        match self {
            Team::Ds => "Ds",
            Team::Mle => "Mle",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ds" => Ok(Team::Ds),
            "mle" => Ok(Team::Mle),
            other => Err(ConfigError::InvalidTeam {
                name: other.to_string(),
            }),
        }
    }
}

/// Connection settings for one team's workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub client_id: String,
    pub client_secret: String,
    pub account_id: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl ClientConfig {
    /// Resolve the team's settings from the process environment.
    pub fn from_env(team: Team) -> ConfigResult<Self> {
        Self::from_lookup(team, |name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(team: Team, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                error!(team = %team, variable = name, "required environment variable is not set");
                ConfigError::MissingEnv {
                    name: name.to_string(),
                }
            })
        };

        Ok(Self {
            host: required(team.host_env_var())?,
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            account_id: lookup(ENV_ACCOUNT_ID).filter(|v| !v.is_empty()),
        })
    }
}
