//! Process execution and PATH lookup for hostkit.

pub mod config;
pub mod shell;
pub mod which;

pub use config::{DEFAULT_MAX_BUFFER_BYTES, ExecOptions};
pub use shell::ShellExecutor;
pub use which::{ExecutableLocator, SearchMode};
