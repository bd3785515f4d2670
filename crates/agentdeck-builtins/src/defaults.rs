use agentdeck_agent::{RetryPolicy, UnitConfig};
use serde::{Deserialize, Serialize};

/// Execution policy applied to every built-in agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefaults {
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-attempt deadline.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between attempts.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AgentDefaults {
    /// Config for agent `name` under these defaults.
    pub fn unit_config(&self, name: &str) -> UnitConfig {
        UnitConfig::new(name)
            .with_max_retries(self.max_retries)
            .with_timeout_ms(self.timeout_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let defaults: AgentDefaults = serde_json::from_str(r#"{"max_retries": 1}"#).unwrap();
        assert_eq!(defaults.max_retries, 1);
        assert_eq!(defaults.timeout_ms, 30_000);
        assert_eq!(defaults.retry, RetryPolicy::immediate());
    }

    #[test]
    fn test_unit_config_applies_policy() {
        let defaults = AgentDefaults {
            max_retries: 0,
            timeout_ms: 250,
            retry: RetryPolicy::immediate(),
        };
        let config = defaults.unit_config("ssl-monitor");
        assert_eq!(config.name, "ssl-monitor");
        assert_eq!(config.max_attempts(), 1);
        assert_eq!(config.timeout_ms, 250);
    }
}
