use serde::{Deserialize, Serialize};

/// Tunables of the dependency-aware orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Pause between two categories of a full run; 0 disables it.
    #[serde(default = "default_category_pause_ms")]
    pub category_pause_ms: u64,
    /// Trackers kept across runs before the oldest are dropped.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_category_pause_ms() -> u64 {
    100
}

fn default_max_history() -> usize {
    1_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            category_pause_ms: default_category_pause_ms(),
            max_history: default_max_history(),
        }
    }
}

/// Tunables of the direct-run registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Run results kept per agent before the oldest are dropped.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

pub(crate) fn default_history_capacity() -> usize {
    50
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
        }
    }
}
