//! Agent for running outside a CI host, e.g. on a developer machine.

use crate::agent::BuildAgent;
use crate::context::{AgentContext, TaskOutcome};
use hostkit_core::{AgentIdentity, Result};
use tracing::{debug, error, info, warn};

/// Routes every host channel through `tracing`.
pub struct LocalAgent {
    identity: AgentIdentity,
    context: AgentContext,
}

impl LocalAgent {
    pub fn new(context: AgentContext) -> Self {
        Self {
            identity: AgentIdentity::new(
                "Local",
                "AGENT_SOURCE_DIR",
                "AGENT_TEMP_DIR",
                "AGENT_TOOLS_DIR",
            ),
            context,
        }
    }
}

impl BuildAgent for LocalAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn context(&self) -> &AgentContext {
        &self.context
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn set_succeeded(&self, message: &str, done: bool) {
        info!(done, "Succeeded: {}", message);
        self.context.record(TaskOutcome::Succeeded {
            message: message.to_string(),
            done,
        });
    }

    fn set_failed(&self, message: &str, done: bool) {
        error!(done, "Failed: {}", message);
        self.context.record(TaskOutcome::Failed {
            message: message.to_string(),
            done,
        });
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        info!(name, value, "Output");
        self.context.sink().write_line(&format!("{}={}", name, value));
        Ok(())
    }

    fn update_build_number(&self, version: &str) {
        info!(version, "Build number updated");
    }
}
