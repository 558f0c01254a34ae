//! UI state persistence configuration.

use serde::{Deserialize, Serialize};

/// Top-level state provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Provider type: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Path of the JSON file used by the `"file"` provider.
    #[serde(default = "default_file_path")]
    pub file_path: String,
    /// In-memory provider configuration.
    #[serde(default)]
    pub memory: MemoryStateConfig,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            file_path: default_file_path(),
            memory: MemoryStateConfig::default(),
        }
    }
}

/// In-memory state provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStateConfig {
    /// Maximum number of entries kept.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryStateConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "file".to_string()
}

fn default_file_path() -> String {
    "data/state.json".to_string()
}

fn default_max_capacity() -> u64 {
    1000
}
