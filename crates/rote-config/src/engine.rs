use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_click_delay_ms() -> u64 {
    80
}

fn default_start_active() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    256
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed-interval solver poll
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Debounce between the two clicks of a pairing, also the busy-flag settle delay
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
    #[serde(default = "default_start_active")]
    pub start_active: bool,
    /// Engine event channel capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            click_delay_ms: default_click_delay_ms(),
            start_active: default_start_active(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
