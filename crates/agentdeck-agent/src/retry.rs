use serde::{Deserialize, Serialize};

/// Delay between attempts of a failing agent.
///
/// The attempt count itself lives on [`crate::UnitConfig::max_retries`];
/// this only shapes the pause between attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Linear step in milliseconds; 0 retries immediately.
    #[serde(default)]
    pub backoff_base_ms: u64,
    /// Cap for a single delay.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

fn default_backoff_max_ms() -> u64 {
    5_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_base_ms: 0,
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl RetryPolicy {
    /// Immediate retries, no delay at all.
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn linear(backoff_base_ms: u64, backoff_max_ms: u64) -> Self {
        Self {
            backoff_base_ms,
            backoff_max_ms,
        }
    }

    /// Delay before the retry that follows the failed `attempt` (0-based).
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let delay = self
            .backoff_base_ms
            .saturating_mul(u64::from(attempt).saturating_add(1));
        delay.min(self.backoff_max_ms)
    }
}
