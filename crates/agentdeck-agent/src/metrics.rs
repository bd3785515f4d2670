use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an agent. `Running` only lasts for one `run()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Idle => write!(f, "idle"),
            AgentStatus::Running => write!(f, "running"),
            AgentStatus::Completed => write!(f, "completed"),
            AgentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Run-time counters owned by a single agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMetrics {
    pub status: AgentStatus,
    pub last_run_at: Option<DateTime<Utc>>,
    /// Latency of the most recent run.
    pub latency_ms: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Running mean over successful runs only.
    pub average_latency_ms: f64,
}

impl UnitMetrics {
    pub(crate) fn mark_running(&mut self) {
        self.status = AgentStatus::Running;
    }

    pub(crate) fn record_success(&mut self, latency_ms: u64, at: DateTime<Utc>) {
        self.status = AgentStatus::Completed;
        self.last_run_at = Some(at);
        self.latency_ms = latency_ms;
        self.success_count += 1;
        // incremental mean: avg += (x - avg) / n
        let n = self.success_count as f64;
        self.average_latency_ms += (latency_ms as f64 - self.average_latency_ms) / n;
    }

    pub(crate) fn record_failure(&mut self, latency_ms: u64, at: DateTime<Utc>) {
        self.status = AgentStatus::Failed;
        self.last_run_at = Some(at);
        self.latency_ms = latency_ms;
        self.failure_count += 1;
    }

    /// Number of completed `run()` calls, successful or not.
    pub fn total_runs(&self) -> u64 {
        self.success_count + self.failure_count
    }
}
