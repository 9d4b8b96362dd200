//! Per-host identity constants.

use serde::{Deserialize, Serialize};

/// Which environment variables back the well-known directories on a host.
///
/// Fixed at construction; hosts expose theirs through `BuildAgent::identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub agent_name: String,
    pub source_dir_variable: String,
    pub temp_dir_variable: String,
    pub cache_dir_variable: String,
}

impl AgentIdentity {
    pub fn new(
        agent_name: impl Into<String>,
        source_dir_variable: impl Into<String>,
        temp_dir_variable: impl Into<String>,
        cache_dir_variable: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            source_dir_variable: source_dir_variable.into(),
            temp_dir_variable: temp_dir_variable.into(),
            cache_dir_variable: cache_dir_variable.into(),
        }
    }
}
