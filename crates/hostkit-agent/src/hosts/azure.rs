//! Azure Pipelines agent.
//!
//! Talks to the agent through `##vso[...]` logging commands on stdout.

use crate::agent::BuildAgent;
use crate::context::{AgentContext, TaskOutcome};
use hostkit_core::{AgentIdentity, Result};

pub struct AzurePipelinesAgent {
    identity: AgentIdentity,
    context: AgentContext,
}

impl AzurePipelinesAgent {
    pub fn new(context: AgentContext) -> Self {
        Self {
            identity: AgentIdentity::new(
                "Azure Pipelines",
                "Build.SourcesDirectory",
                "Agent.TempDirectory",
                "Agent.ToolsDirectory",
            ),
            context,
        }
    }

    fn command(&self, name: &str, properties: &[(&str, &str)], data: &str) {
        let props: String = properties
            .iter()
            .map(|(k, v)| format!("{}={};", k, escape_property(v)))
            .collect();
        let line = if props.is_empty() {
            format!("##vso[{}]{}", name, escape_data(data))
        } else {
            format!("##vso[{} {}]{}", name, props, escape_data(data))
        };
        self.context.sink().write_line(&line);
    }

    fn complete(&self, result: &str, message: &str, done: bool) {
        let mut properties = vec![("result", result)];
        if done {
            properties.push(("done", "true"));
        }
        self.command("task.complete", &properties, message);
    }
}

impl BuildAgent for AzurePipelinesAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn context(&self) -> &AgentContext {
        &self.context
    }

    /// Pipeline variables are exported with dots replaced and uppercased.
    fn variable_key(&self, name: &str) -> String {
        name.replace('.', "_").to_uppercase()
    }

    fn debug(&self, message: &str) {
        self.command("task.debug", &[], message);
    }

    fn info(&self, message: &str) {
        self.context.sink().write_line(message);
    }

    fn warn(&self, message: &str) {
        self.command("task.logissue", &[("type", "warning")], message);
    }

    fn error(&self, message: &str) {
        self.command("task.logissue", &[("type", "error")], message);
    }

    fn set_succeeded(&self, message: &str, done: bool) {
        self.complete("Succeeded", message, done);
        self.context.record(TaskOutcome::Succeeded {
            message: message.to_string(),
            done,
        });
    }

    fn set_failed(&self, message: &str, done: bool) {
        self.error(message);
        self.complete("Failed", message, done);
        self.context.record(TaskOutcome::Failed {
            message: message.to_string(),
            done,
        });
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.command(
            "task.setvariable",
            &[("variable", name), ("isOutput", "true")],
            value,
        );
        Ok(())
    }

    fn update_build_number(&self, version: &str) {
        self.command("build.updatebuildnumber", &[], version);
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(';', "%3B").replace(']', "%5D")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use hostkit_cache::CacheOptions;
    use hostkit_core::MemoryEnv;
    use hostkit_runner::ExecOptions;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn agent(env: MemoryEnv) -> (AzurePipelinesAgent, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let context = AgentContext::new(
            env.shared(),
            sink.clone(),
            ExecOptions::default(),
            CacheOptions::default(),
        );
        (AzurePipelinesAgent::new(context), sink)
    }

    #[test]
    fn test_status_commands() {
        let (agent, sink) = agent(MemoryEnv::new());
        agent.set_succeeded("all good", true);
        agent.set_failed("broken", false);
        agent.set_output("semVer", "5.12.0").unwrap();
        agent.update_build_number("5.12.0+7");

        assert_eq!(
            sink.lines(),
            vec![
                "##vso[task.complete result=Succeeded;done=true;]all good",
                "##vso[task.logissue type=error;]broken",
                "##vso[task.complete result=Failed;]broken",
                "##vso[task.setvariable variable=semVer;isOutput=true;]5.12.0",
                "##vso[build.updatebuildnumber]5.12.0+7",
            ]
        );
        assert!(agent.outcome().unwrap().is_failed());
    }

    #[test]
    fn test_logging_commands_escape_data() {
        let (agent, sink) = agent(MemoryEnv::new());
        agent.warn("50% done\nnext");
        agent.info("plain");
        assert_eq!(
            sink.lines(),
            vec![
                "##vso[task.logissue type=warning;]50%AZP25 done%0Anext",
                "plain",
            ]
        );
    }

    #[test]
    fn test_property_escaping() {
        assert_eq!(escape_property("a;b]c"), "a%3Bb%5Dc");
    }

    #[cfg(unix)]
    #[test]
    fn test_identity_variables_use_transformed_keys() {
        let env = MemoryEnv::from_pairs([
            ("BUILD_SOURCESDIRECTORY", "/agent/_work/1/s"),
            ("AGENT_TOOLSDIRECTORY", "/agent/_work/_tool"),
        ]);
        let (agent, sink) = agent(env);

        assert_eq!(
            agent.get_source_dir().unwrap(),
            Some(std::path::PathBuf::from("/agent/_work/1/s"))
        );
        assert_eq!(
            agent.get_cache_dir().unwrap(),
            Some(std::path::PathBuf::from("/agent/_work/_tool"))
        );
        assert_eq!(agent.get_temp_dir().unwrap(), None);
        assert_eq!(
            sink.lines()[0],
            "##vso[task.debug]getVariable - BUILD_SOURCESDIRECTORY: /agent/_work/1/s"
        );
    }
}
