//! Process-scoped environment state.
//!
//! Every accessor in hostkit reads through an [`EnvStore`] rather than the OS
//! environment directly, so tests can run against a [`MemoryEnv`] without
//! touching the real process. The store is read at any time and mutated only
//! by `add_path` on the build agent.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Name of the variable holding the executable search path on this platform.
#[cfg(windows)]
pub const PATH_VAR: &str = "Path";
#[cfg(not(windows))]
pub const PATH_VAR: &str = "PATH";

/// Separator between entries of the search path.
#[cfg(windows)]
pub const PATH_DELIMITER: char = ';';
#[cfg(not(windows))]
pub const PATH_DELIMITER: char = ':';

/// Key-value view over environment variables.
pub trait EnvStore: Send + Sync + fmt::Debug {
    /// Raw value, `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Set or overwrite a value.
    fn set(&self, key: &str, value: &str);

    /// Snapshot of all variables, used to seed child processes.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Environment handle shared between the agent and its components.
pub type SharedEnv = Arc<dyn EnvStore>;

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn shared() -> SharedEnv {
        Arc::new(ProcessEnv)
    }
}

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: the agent mutates the environment only from `add_path`, and
        // the execution model is a single logical task per process.
        unsafe { std::env::set_var(key, value) };
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// In-memory environment for tests and embedding.
#[derive(Default)]
pub struct MemoryEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a copy of the current process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(ProcessEnv.vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| {
                let key: String = k.into();
                (normalize_key(&key), v.into())
            })
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    pub fn shared(self) -> SharedEnv {
        Arc::new(self)
    }

    pub fn remove(&self, key: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize_key(key));
    }
}

impl fmt::Debug for MemoryEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.vars.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("MemoryEnv").field("len", &len).finish()
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_key(key))
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize_key(key), value.to_string());
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

// Windows variable names are case-insensitive.
#[cfg(windows)]
fn normalize_key(key: &str) -> String {
    key.to_uppercase()
}

#[cfg(not(windows))]
fn normalize_key(key: &str) -> String {
    key.to_string()
}
