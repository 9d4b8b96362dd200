//! GitHub Actions agent.
//!
//! Logging goes through `::command::` workflow commands; outputs and PATH
//! additions are appended to the files the runner names in `GITHUB_OUTPUT`
//! and `GITHUB_PATH`.

use crate::agent::BuildAgent;
use crate::context::{AgentContext, TaskOutcome};
use hostkit_core::{AgentIdentity, EnvStore, Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

pub struct GitHubActionsAgent {
    identity: AgentIdentity,
    context: AgentContext,
}

impl GitHubActionsAgent {
    pub fn new(context: AgentContext) -> Self {
        Self {
            identity: AgentIdentity::new(
                "GitHub Actions",
                "GITHUB_WORKSPACE",
                "RUNNER_TEMP",
                "RUNNER_TOOL_CACHE",
            ),
            context,
        }
    }

    fn command(&self, name: &str, properties: &[(&str, &str)], data: &str) {
        let props = properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, escape_property(v)))
            .collect::<Vec<_>>()
            .join(",");
        let line = if props.is_empty() {
            format!("::{}::{}", name, escape_data(data))
        } else {
            format!("::{} {}::{}", name, props, escape_data(data))
        };
        self.context.sink().write_line(&line);
    }

    /// Path of a runner command file, `None` outside a runner.
    fn command_file(&self, variable: &str) -> Option<String> {
        self.context
            .env()
            .get(variable)
            .filter(|path| !path.trim().is_empty())
    }

    fn append(&self, file: &str, contents: &str) -> Result<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .map_err(|e| Error::filesystem(file, e))?;
        handle
            .write_all(contents.as_bytes())
            .map_err(|e| Error::filesystem(file, e))
    }
}

impl BuildAgent for GitHubActionsAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn context(&self) -> &AgentContext {
        &self.context
    }

    fn debug(&self, message: &str) {
        self.command("debug", &[], message);
    }

    fn info(&self, message: &str) {
        self.context.sink().write_line(message);
    }

    fn warn(&self, message: &str) {
        self.command("warning", &[], message);
    }

    fn error(&self, message: &str) {
        self.command("error", &[], message);
    }

    fn set_succeeded(&self, message: &str, done: bool) {
        if !message.is_empty() {
            self.info(message);
        }
        self.context.record(TaskOutcome::Succeeded {
            message: message.to_string(),
            done,
        });
    }

    fn set_failed(&self, message: &str, done: bool) {
        self.error(message);
        self.context.record(TaskOutcome::Failed {
            message: message.to_string(),
            done,
        });
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(file) = self.command_file("GITHUB_OUTPUT") else {
            self.command("set-output", &[("name", name)], value);
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(Error::Config(format!(
                "Output '{}' must not contain the delimiter {}",
                name, delimiter
            )));
        }
        self.append(
            &file,
            &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"),
        )
    }

    fn update_build_number(&self, version: &str) {
        self.debug(&format!(
            "Updating the build number is not supported on {}: {}",
            self.identity.agent_name, version
        ));
    }

    fn persist_path(&self, path: &Path) -> Result<()> {
        match self.command_file("GITHUB_PATH") {
            Some(file) => self.append(&file, &format!("{}\n", path.display())),
            None => Ok(()),
        }
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
