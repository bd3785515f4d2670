use agentdeck_core::{AgentdeckError, AgentdeckResult};
use serde::{Deserialize, Serialize};

/// Identity and execution policy of a single agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Unique, non-empty agent name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Additional attempts after the first failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Budget for one attempt of the three-phase body.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_enabled() -> bool {
    true
}

impl UnitConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
            enabled: default_enabled(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Total attempts a run may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Reject configurations an agent cannot run with.
    pub fn validate(&self) -> AgentdeckResult<()> {
        if self.name.trim().is_empty() {
            return Err(AgentdeckError::Config(
                "agent name must not be empty".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(AgentdeckError::Config(format!(
                "agent '{}' must have a positive timeout",
                self.name
            )));
        }
        Ok(())
    }
}
