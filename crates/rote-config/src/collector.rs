use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_auto_interval_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_open_timeout_ms() -> u64 {
    3000
}

fn default_settle_ms() -> u64 {
    300
}

fn default_close_delay_ms() -> u64 {
    200
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CollectorConfig {
    /// Run the auto-collect timer
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_auto_interval_ms")]
    pub auto_interval_ms: u64,
    /// Grid visibility poll while opening
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_open_timeout_ms")]
    pub open_timeout_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl CollectorConfig {
    pub fn auto_interval(&self) -> Duration {
        Duration::from_millis(self.auto_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auto_interval_ms: default_auto_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            open_timeout_ms: default_open_timeout_ms(),
            settle_ms: default_settle_ms(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}
