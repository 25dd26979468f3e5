use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::collector::CollectorConfig;
use self::completion::CompletionConfig;
use self::engine::EngineConfig;
use self::hotkeys::HotkeyConfig;
use self::storage::StorageConfig;

pub mod collector;
pub mod completion;
pub mod engine;
pub mod hotkeys;
pub mod storage;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub collector: CollectorConfig,
    pub storage: StorageConfig,
    pub hotkeys: HotkeyConfig,
    pub completion: CompletionConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file, then apply environment overrides on top
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_parse("ROTE_POLL_MS") {
            self.engine.poll_interval_ms = v;
        }
        if let Some(v) = env_parse("ROTE_CLICK_DELAY_MS") {
            self.engine.click_delay_ms = v;
        }
        if let Some(v) = env_parse("ROTE_COLLECT_INTERVAL_MS") {
            self.collector.auto_interval_ms = v;
        }
        if let Some(v) = env_parse("ROTE_AUTO_COLLECT") {
            self.collector.enabled = v;
        }
        if let Ok(dir) = env::var("ROTE_STATE_DIR") {
            self.storage.state_dir = PathBuf::from(dir);
        }
        if let Some(v) = env_parse("ROTE_COMPLETION_TIMEOUT_SECS") {
            self.completion.timeout_secs = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_site_timings() {
        let config = Config::default();
        assert_eq!(config.engine.poll_interval_ms, 200);
        assert_eq!(config.engine.click_delay_ms, 80);
        assert!(config.engine.start_active);
        assert_eq!(config.collector.auto_interval_ms, 5000);
        assert_eq!(config.collector.open_timeout_ms, 3000);
        assert_eq!(config.storage.slot_key, "rwStore");
        assert_eq!(config.completion.timeout_secs, 1800);
        assert!(config.hotkeys.is_toggle("Q"));
        assert!(config.hotkeys.is_collect("e"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "engine": {{ "click_delay_ms": 120 }}, "hotkeys": {{ "toggle": "p" }} }}"#)
            .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.engine.click_delay_ms, 120);
        assert_eq!(config.engine.poll_interval_ms, 200);
        assert!(config.hotkeys.is_toggle("P"));
        assert!(config.hotkeys.is_collect("e"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
