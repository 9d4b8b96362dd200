//! Executor configuration.

use serde::{Deserialize, Serialize};

/// Combined stdout/stderr capture ceiling: 10 MiB.
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for process execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOptions {
    /// Maximum number of bytes captured across stdout and stderr.
    /// Exceeding it kills the child and fails the result.
    #[serde(default = "default_max_buffer")]
    pub max_buffer_bytes: usize,
}

fn default_max_buffer() -> usize {
    DEFAULT_MAX_BUFFER_BYTES
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            max_buffer_bytes: default_max_buffer(),
        }
    }
}
