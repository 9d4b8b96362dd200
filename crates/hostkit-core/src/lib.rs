//! Hostkit Core
//!
//! Core types, errors and environment access shared by every hostkit crate.
//! This crate has minimal dependencies and defines the vocabulary used by the
//! runner, the tool cache and the build agents.

pub mod env;
pub mod error;
pub mod exec;
pub mod expansion;
pub mod identity;
pub mod paths;

pub use env::{EnvStore, MemoryEnv, ProcessEnv, SharedEnv};
pub use error::{Error, Result};
pub use exec::{ExecFailure, ExecResult};
pub use identity::AgentIdentity;
