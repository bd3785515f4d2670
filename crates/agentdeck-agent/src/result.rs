use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal outcome of one `run()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Immutable record produced by one execution of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub agent: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub latency_ms: u64,
    pub tasks_completed: u32,
    pub total_tasks: u32,
    /// Attempts made; 0 when the agent refused to start.
    #[serde(default)]
    pub attempts: u32,
    pub error: Option<String>,
    /// Output of the `process` phase on success.
    pub payload: Option<serde_json::Value>,
}

impl RunResult {
    pub fn completed(
        agent: impl Into<String>,
        started_at: DateTime<Utc>,
        attempts: u32,
        payload: serde_json::Value,
    ) -> Self {
        let finished_at = Utc::now();
        Self {
            agent: agent.into(),
            status: RunStatus::Completed,
            started_at,
            finished_at,
            latency_ms: elapsed_ms(started_at, finished_at),
            tasks_completed: 1,
            total_tasks: 1,
            attempts,
            error: None,
            payload: Some(payload),
        }
    }

    pub fn failed(
        agent: impl Into<String>,
        started_at: DateTime<Utc>,
        attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        let finished_at = Utc::now();
        Self {
            agent: agent.into(),
            status: RunStatus::Failed,
            started_at,
            finished_at,
            latency_ms: elapsed_ms(started_at, finished_at),
            tasks_completed: 0,
            total_tasks: 1,
            attempts,
            error: Some(error.into()),
            payload: None,
        }
    }

    /// Failed result for an invocation that never produced its own result,
    /// e.g. because the task running it panicked.
    pub fn synthetic_failure(agent: impl Into<String>, error: impl Into<String>) -> Self {
        Self::failed(agent, Utc::now(), 0, error)
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

pub(crate) fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_result() {
        let result = RunResult::completed("billing", Utc::now(), 1, serde_json::json!({"mrr": 10}));
        assert!(result.is_success());
        assert_eq!(result.tasks_completed, 1);
        assert_eq!(result.total_tasks, 1);
        assert!(result.error.is_none());
        assert!(result.finished_at >= result.started_at);
    }

    #[test]
    fn test_synthetic_failure_counts_zero_of_one() {
        let result = RunResult::synthetic_failure("crm-sync", "task panicked");
        assert_eq!(result.status, RunStatus::Failed);
        assert_eq!(result.tasks_completed, 0);
        assert_eq!(result.total_tasks, 1);
        assert_eq!(result.attempts, 0);
        assert_eq!(result.error.as_deref(), Some("task panicked"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RunStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        let parsed: RunStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, RunStatus::Failed);
    }
}
