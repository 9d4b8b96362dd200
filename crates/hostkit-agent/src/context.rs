//! State shared by every host implementation.

use crate::config::AgentConfig;
use crate::sink::CommandSink;
use hostkit_cache::CacheOptions;
use hostkit_core::SharedEnv;
use hostkit_runner::{ExecOptions, ShellExecutor};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Last terminal status reported through `set_succeeded`/`set_failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TaskOutcome {
    Succeeded { message: String, done: bool },
    Failed { message: String, done: bool },
}

impl TaskOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }
}

/// Environment, sink and tuning handed to a host at construction.
#[derive(Debug)]
pub struct AgentContext {
    env: SharedEnv,
    sink: Arc<dyn CommandSink>,
    executor: ShellExecutor,
    cache_options: CacheOptions,
    outcome: Mutex<Option<TaskOutcome>>,
}

impl AgentContext {
    pub fn new(
        env: SharedEnv,
        sink: Arc<dyn CommandSink>,
        exec_options: ExecOptions,
        cache_options: CacheOptions,
    ) -> Self {
        let executor = ShellExecutor::new(Arc::clone(&env), exec_options);
        Self {
            env,
            sink,
            executor,
            cache_options,
            outcome: Mutex::new(None),
        }
    }

    pub fn from_config(config: &AgentConfig, env: SharedEnv, sink: Arc<dyn CommandSink>) -> Self {
        Self::new(env, sink, config.exec, config.cache)
    }

    pub fn env(&self) -> &SharedEnv {
        &self.env
    }

    pub fn sink(&self) -> &dyn CommandSink {
        self.sink.as_ref()
    }

    pub fn executor(&self) -> &ShellExecutor {
        &self.executor
    }

    pub fn cache_options(&self) -> CacheOptions {
        self.cache_options
    }

    pub fn record(&self, outcome: TaskOutcome) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }

    pub fn outcome(&self) -> Option<TaskOutcome> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
