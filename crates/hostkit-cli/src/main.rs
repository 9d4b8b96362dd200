//! hostkit CLI entrypoint.

use clap::Parser;
use hostkit_agent::{AgentConfig, BuildAgent, HostKind, LogFormat, StdoutSink, create_agent};
use hostkit_core::ProcessEnv;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};

mod commands;
mod handlers;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "hostkit")]
#[command(author, version, about = "Run build steps the same way on any CI host", long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "HOSTKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Host to target: auto, azure, github or local
    #[arg(long)]
    host: Option<HostKind>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.host) {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogFormat::Text);
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);
    debug!(host = ?config.host, "Configuration loaded");

    let agent = create_agent(&config, ProcessEnv::shared(), StdoutSink::shared());

    match handlers::run(&*agent, cli.command).await {
        Ok(message) => agent.set_succeeded(&message, true),
        Err(e) => agent.set_failed(&e.to_string(), true),
    }

    match agent.outcome() {
        Some(outcome) if outcome.is_failed() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Read the optional config file and apply the `--host` override.
fn load_config(path: Option<&Path>, host: Option<HostKind>) -> hostkit_core::Result<AgentConfig> {
    let mut config = match path {
        Some(path) => AgentConfig::from_file(path)?,
        None => AgentConfig::default(),
    };
    if let Some(host) = host {
        config.host = host;
    }
    Ok(config)
}
