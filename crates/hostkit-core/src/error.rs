//! Error types for hostkit.
//!
//! Configuration and argument errors are returned as `Err`. Process failures
//! are not errors; see [`crate::exec::ExecResult`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Input required and not supplied: {key}")]
    MissingRequiredInput { key: String },

    #[error("Parameter '{name}' is required")]
    InvalidParameter { name: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),

    // Locator errors
    #[error("Unable to locate executable file: {tool}")]
    ExecutableNotFound { tool: String },

    // Filesystem errors
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Fail with [`Error::InvalidParameter`] when `value` is empty.
    pub fn require(name: &'static str, value: &str) -> Result<()> {
        if value.is_empty() {
            Err(Error::InvalidParameter { name })
        } else {
            Ok(())
        }
    }
}
