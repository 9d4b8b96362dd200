//! Host implementations and host selection.

mod azure;
mod github;
mod local;

pub use azure::AzurePipelinesAgent;
pub use github::GitHubActionsAgent;
pub use local::LocalAgent;

use crate::agent::BuildAgent;
use crate::config::{AgentConfig, HostKind};
use crate::context::AgentContext;
use crate::sink::CommandSink;
use hostkit_core::SharedEnv;
use std::sync::Arc;
use tracing::debug;

/// Build the agent for the configured host, detecting it from `env` when the
/// configuration says `auto`.
pub fn create_agent(
    config: &AgentConfig,
    env: SharedEnv,
    sink: Arc<dyn CommandSink>,
) -> Box<dyn BuildAgent> {
    let host = config.host.resolve(env.as_ref());
    let context = AgentContext::from_config(config, env, sink);
    debug!(?host, "Creating build agent");

    match host {
        HostKind::Azure => Box::new(AzurePipelinesAgent::new(context)),
        HostKind::Github => Box::new(GitHubActionsAgent::new(context)),
        HostKind::Local | HostKind::Auto => Box::new(LocalAgent::new(context)),
    }
}
