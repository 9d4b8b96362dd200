//! Cache configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for destructive cache updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Additional attempts when removing an existing entry fails.
    #[serde(default = "default_remove_retries")]
    pub remove_retries: u32,
    /// Fixed delay between removal attempts.
    #[serde(default = "default_remove_retry_delay_ms")]
    pub remove_retry_delay_ms: u64,
}

fn default_remove_retries() -> u32 {
    3
}

fn default_remove_retry_delay_ms() -> u64 {
    100
}

impl CacheOptions {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.remove_retry_delay_ms)
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            remove_retries: default_remove_retries(),
            remove_retry_delay_ms: default_remove_retry_delay_ms(),
        }
    }
}
