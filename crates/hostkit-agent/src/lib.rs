//! Build agent abstraction for hostkit.
//!
//! A [`BuildAgent`] is obtained for the current CI host and is the only
//! surface calling code talks to. Hosts differ in their variable names and
//! in how they log, report status and publish outputs; everything else is
//! shared through the trait's provided methods.

pub mod agent;
pub mod config;
pub mod context;
pub mod hosts;
pub mod inputs;
pub mod sink;

pub use agent::BuildAgent;
pub use config::{AgentConfig, HostKind, LogFormat};
pub use context::{AgentContext, TaskOutcome};
pub use hosts::{AzurePipelinesAgent, GitHubActionsAgent, LocalAgent, create_agent};
pub use sink::{CommandSink, MemorySink, StdoutSink};
