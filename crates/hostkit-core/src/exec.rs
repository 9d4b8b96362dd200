//! Outcome of a single process invocation.

use serde::Serialize;
use thiserror::Error;

/// Why a process invocation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecFailure {
    #[error("Failed to spawn process: {message}")]
    Spawn { message: String },

    #[error("Command failed with exit code {code}")]
    NonZeroExit { code: i32 },

    #[error("Command terminated by signal")]
    Signal,

    #[error("Output exceeded maximum buffer of {limit} bytes")]
    MaxBufferExceeded { limit: usize },

    #[error("IO error while reading process output: {message}")]
    Io { message: String },
}

/// Result of running a command.
///
/// Always returned, never raised: callers branch on [`ExecResult::code`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecResult {
    /// Exit code, `None` when the process never exited normally.
    pub code: Option<i32>,
    pub error: Option<ExecFailure>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            code: Some(0),
            error: None,
            stdout,
            stderr,
        }
    }

    pub fn failure(
        code: Option<i32>,
        error: ExecFailure,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            code,
            error: Some(error),
            stdout,
            stderr,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0) && self.error.is_none()
    }
}
