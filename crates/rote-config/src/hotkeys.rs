use serde::{Deserialize, Serialize};

fn default_toggle() -> String {
    "q".to_string()
}

fn default_collect() -> String {
    "e".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Toggles the solver routines on and off
    #[serde(default = "default_toggle")]
    pub toggle: String,
    /// Runs a bulk collection without closing the grid afterwards
    #[serde(default = "default_collect")]
    pub collect: String,
}

impl HotkeyConfig {
    pub fn is_toggle(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.toggle)
    }

    pub fn is_collect(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.collect)
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle(),
            collect: default_collect(),
        }
    }
}
