//! Command handlers.
//!
//! Each handler returns the message reported through `set_succeeded`; errors
//! are reported through `set_failed` by the caller.

use crate::commands::Commands;
use console::style;
use hostkit_agent::BuildAgent;
use std::error::Error;
use std::path::Path;

pub type HandlerResult = Result<String, Box<dyn Error>>;

pub async fn run(agent: &dyn BuildAgent, command: Commands) -> HandlerResult {
    match command {
        Commands::Which { tool } => which(agent, &tool).await,
        Commands::Exec {
            command,
            args,
            json,
        } => exec(agent, &command, &args, json).await,
        Commands::Input {
            name,
            required,
            bool,
            list,
            delimiter,
        } => input(agent, &name, required, bool, list, delimiter.as_deref()),
        Commands::Expand { pattern } => {
            println!("{}", agent.get_expanded_string(&pattern));
            Ok(String::new())
        }
        Commands::Dirs => dirs(agent),
        Commands::Cache { dir, tool, version } => cache(agent, &dir, &tool, &version).await,
        Commands::Find { tool, version } => find(agent, &tool, &version).await,
        Commands::AddPath { dir } => {
            agent.add_path(&dir)?;
            Ok(format!("Added {} to PATH", dir.display()))
        }
        Commands::Output { name, value } => {
            agent.set_output(&name, &value)?;
            Ok(String::new())
        }
        Commands::BuildNumber { value } => {
            agent.update_build_number(&value);
            Ok(String::new())
        }
    }
}

async fn which(agent: &dyn BuildAgent, tool: &str) -> HandlerResult {
    let path = agent.which(tool).await?;
    println!("{}", path.display());
    Ok(String::new())
}

async fn exec(agent: &dyn BuildAgent, command: &str, args: &[String], json: bool) -> HandlerResult {
    let result = agent.exec(command, args).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.stdout);
        eprint!("{}", result.stderr);
    }

    match result.error {
        None => Ok(String::new()),
        Some(failure) => Err(failure.into()),
    }
}

fn input(
    agent: &dyn BuildAgent,
    name: &str,
    required: bool,
    as_bool: bool,
    as_list: bool,
    delimiter: Option<&str>,
) -> HandlerResult {
    if as_bool {
        println!("{}", agent.get_boolean_input(name, required)?);
    } else if as_list {
        for item in agent.get_list_input(name, required)? {
            println!("{}", item);
        }
    } else if let Some(delimiter) = delimiter {
        for item in agent.get_delimited_input(name, delimiter, required)? {
            println!("{}", item);
        }
    } else {
        println!("{}", agent.get_input(name, required)?);
    }
    Ok(String::new())
}

fn dirs(agent: &dyn BuildAgent) -> HandlerResult {
    let show = |label: &str, dir: Option<std::path::PathBuf>| match dir {
        Some(dir) => println!("{:<7} {}", label, dir.display()),
        None => println!("{:<7} {}", label, style("(not set)").dim()),
    };

    println!("{}", style(agent.agent_name()).bold());
    show("source", agent.get_source_dir()?);
    show("temp", agent.get_temp_dir()?);
    show("cache", agent.get_cache_dir()?);
    Ok(String::new())
}

async fn cache(agent: &dyn BuildAgent, dir: &Path, tool: &str, version: &str) -> HandlerResult {
    match agent.cache_tool_directory(dir, tool, version).await? {
        Some(path) => {
            println!("{} Cached {} {}", style("✓").green(), style(tool).bold(), version);
            println!("  {}", path.display());
            Ok(format!("Cached {} {}", tool, version))
        }
        None => {
            println!("{} Tool cache not configured, nothing cached", style("!").yellow());
            Ok(String::new())
        }
    }
}

async fn find(agent: &dyn BuildAgent, tool: &str, version: &str) -> HandlerResult {
    match agent.find_local_tool(tool, version).await? {
        Some(path) => {
            println!("{}", path.display());
            Ok(String::new())
        }
        None => Err(format!("{} {} not found in tool cache", tool, version).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostkit_agent::{AgentConfig, HostKind, MemorySink, create_agent};
    use hostkit_core::{EnvStore, MemoryEnv};
    use std::sync::Arc;

    fn local_agent(env: Arc<MemoryEnv>) -> Box<dyn BuildAgent> {
        let config = AgentConfig {
            host: HostKind::Local,
            ..AgentConfig::default()
        };
        create_agent(&config, env, Arc::new(MemorySink::new()))
    }

    #[tokio::test]
    async fn test_cache_and_find_commands() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("tool"), b"x").unwrap();

        let env = Arc::new(MemoryEnv::new());
        env.set("AGENT_TOOLS_DIR", &root.path().to_string_lossy());
        let agent = local_agent(env);

        let message = run(
            &*agent,
            Commands::Cache {
                dir: src.path().to_path_buf(),
                tool: "gitversion".into(),
                version: "v5.12.0".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(message, "Cached gitversion v5.12.0");

        let found = run(
            &*agent,
            Commands::Find {
                tool: "gitversion".into(),
                version: "5.12.0".into(),
            },
        )
        .await;
        assert!(found.is_ok());
    }

    #[tokio::test]
    async fn test_find_miss_is_error() {
        let agent = local_agent(Arc::new(MemoryEnv::new()));
        let err = run(
            &*agent,
            Commands::Find {
                tool: "gitversion".into(),
                version: "5.12.0".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_required_input_error_propagates() {
        let agent = local_agent(Arc::new(MemoryEnv::new()));
        let err = run(
            &*agent,
            Commands::Input {
                name: "versionSpec".into(),
                required: true,
                bool: false,
                list: false,
                delimiter: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("INPUT_VERSIONSPEC"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_failure_becomes_error() {
        let agent = local_agent(Arc::new(MemoryEnv::from_process()));
        let err = run(
            &*agent,
            Commands::Exec {
                command: "exit".into(),
                args: vec!["4".into()],
                json: false,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("exit code 4"));
    }
}
