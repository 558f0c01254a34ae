//! Entity store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-memory entity stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `tree.json`, `testCases.json`, `issues.json` and
    /// `testRuns.json`. Missing files are treated as empty collections.
    #[serde(default = "default_seed_dir")]
    pub seed_dir: String,
    /// Artificial latency applied to every entity store call, in milliseconds.
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_dir: default_seed_dir(),
            simulated_latency_ms: 0,
        }
    }
}

fn default_seed_dir() -> String {
    "config/seed".to_string()
}
