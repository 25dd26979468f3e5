use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_marker() -> String {
    "HOMEWORK COMPLETE".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    1800
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    /// Literal text the page shows once the homework is done
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CompletionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
