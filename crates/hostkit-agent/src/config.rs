//! Agent configuration.

use hostkit_cache::CacheOptions;
use hostkit_core::{EnvStore, Error, Result};
use hostkit_runner::ExecOptions;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported CI hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    /// Detect from the environment.
    #[default]
    Auto,
    Azure,
    Github,
    Local,
}

impl HostKind {
    /// Resolve `Auto` against the environment; concrete kinds pass through.
    pub fn resolve(self, env: &dyn EnvStore) -> HostKind {
        match self {
            HostKind::Auto => Self::detect(env),
            other => other,
        }
    }

    /// `TF_BUILD` marks Azure Pipelines, `GITHUB_ACTIONS=true` marks GitHub
    /// Actions, anything else runs locally.
    pub fn detect(env: &dyn EnvStore) -> HostKind {
        if env.get("TF_BUILD").is_some_and(|v| !v.is_empty()) {
            HostKind::Azure
        } else if env
            .get("GITHUB_ACTIONS")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            HostKind::Github
        } else {
            HostKind::Local
        }
    }
}

impl FromStr for HostKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(HostKind::Auto),
            "azure" | "azure-pipelines" => Ok(HostKind::Azure),
            "github" | "github-actions" => Ok(HostKind::Github),
            "local" => Ok(HostKind::Local),
            other => Err(Error::Config(format!("Unknown host: {}", other))),
        }
    }
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Agent configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub host: HostKind,
    #[serde(flatten)]
    pub exec: ExecOptions,
    #[serde(flatten)]
    pub cache: CacheOptions,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl AgentConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }
}
