use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_state_dir() -> PathBuf {
    PathBuf::from(".rote")
}

fn default_slot_key() -> String {
    "rwStore".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted slots
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Slot the card store is written to
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
    /// Keep the store in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            slot_key: default_slot_key(),
            ephemeral: false,
        }
    }
}
