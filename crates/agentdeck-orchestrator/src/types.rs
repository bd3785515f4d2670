use crate::catalog::AgentCategory;
use agentdeck_agent::RunResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Status of one tracked invocation within an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    /// Not invoked: the entry is disabled or has no bound agent.
    Pending,
    Running,
    Success,
    Failed,
}

impl std::fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerStatus::Pending => write!(f, "pending"),
            TrackerStatus::Running => write!(f, "running"),
            TrackerStatus::Success => write!(f, "success"),
            TrackerStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Record of one attempted invocation during an orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTracker {
    pub execution_id: Uuid,
    pub agent_id: String,
    pub category: AgentCategory,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: TrackerStatus,
    pub result: Option<RunResult>,
    pub error: Option<String>,
}

impl ExecutionTracker {
    pub fn start(execution_id: Uuid, agent_id: impl Into<String>, category: AgentCategory) -> Self {
        Self {
            execution_id,
            agent_id: agent_id.into(),
            category,
            started_at: Utc::now(),
            finished_at: None,
            status: TrackerStatus::Running,
            result: None,
            error: None,
        }
    }

    /// Settle the tracker from the agent's own result.
    pub fn finish(mut self, result: RunResult) -> Self {
        self.status = if result.is_success() {
            TrackerStatus::Success
        } else {
            TrackerStatus::Failed
        };
        self.error = result.error.clone();
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.status = TrackerStatus::Failed;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn skip(mut self, reason: impl Into<String>) -> Self {
        self.status = TrackerStatus::Pending;
        self.error = Some(reason.into());
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == TrackerStatus::Success
    }

    /// Wall-clock duration of the invocation, once settled.
    pub fn duration_ms(&self) -> Option<u64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds().max(0) as u64)
    }

    /// Latency reported by the agent, falling back to the tracker's own span.
    pub fn latency_ms(&self) -> Option<u64> {
        self.result
            .as_ref()
            .map(|r| r.latency_ms)
            .or_else(|| self.duration_ms())
    }
}

/// Outcome of one category within a run. Trackers are in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryExecutionResult {
    pub category: AgentCategory,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Trackers left pending (disabled or unbound).
    pub skipped: usize,
    pub success_rate: f64,
    pub duration_ms: u64,
    pub trackers: Vec<ExecutionTracker>,
}

impl CategoryExecutionResult {
    pub fn from_trackers(
        category: AgentCategory,
        trackers: Vec<ExecutionTracker>,
        duration_ms: u64,
    ) -> Self {
        let counts = StatusCounts::tally(&trackers);
        Self {
            category,
            total: trackers.len(),
            successful: counts.successful,
            failed: counts.failed,
            skipped: counts.skipped,
            success_rate: rate(counts.successful, trackers.len()),
            duration_ms,
            trackers,
        }
    }
}

/// Global counts for a full run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub success_rate: f64,
    pub duration_ms: u64,
}

/// Result of [`crate::Orchestrator::run_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub execution_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: OrchestrationSummary,
    pub categories: Vec<CategoryExecutionResult>,
    /// Every tracker of the run, in the order they settled.
    pub history: Vec<ExecutionTracker>,
}

impl OrchestrationResult {
    pub fn tracker(&self, agent_id: &str) -> Option<&ExecutionTracker> {
        self.history.iter().find(|t| t.agent_id == agent_id)
    }
}

/// Query over the orchestrator's execution history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub agent_id: Option<String>,
    pub status: Option<TrackerStatus>,
    /// Keep only the most recent N matches.
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn agent(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TrackerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, tracker: &ExecutionTracker) -> bool {
        self.agent_id
            .as_deref()
            .map_or(true, |id| tracker.agent_id == id)
            && self.status.map_or(true, |s| tracker.status == s)
    }
}

/// Aggregates for one category across the whole retained history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    /// Mean latency over successful trackers only.
    pub average_latency_ms: f64,
}

/// Aggregates across the whole retained history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorStatistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub average_latency_ms: f64,
    pub by_category: BTreeMap<AgentCategory, CategoryStatistics>,
}

impl OrchestratorStatistics {
    pub fn from_history(history: &[ExecutionTracker]) -> Self {
        let mut grouped: BTreeMap<AgentCategory, Vec<&ExecutionTracker>> = BTreeMap::new();
        for tracker in history {
            grouped.entry(tracker.category).or_default().push(tracker);
        }

        let by_category = grouped
            .into_iter()
            .map(|(category, trackers)| (category, category_statistics(&trackers)))
            .collect();

        let all: Vec<&ExecutionTracker> = history.iter().collect();
        let overall = category_statistics(&all);

        Self {
            total: overall.total,
            successful: overall.successful,
            failed: overall.failed,
            success_rate: overall.success_rate,
            average_latency_ms: overall.average_latency_ms,
            by_category,
        }
    }
}

fn category_statistics(trackers: &[&ExecutionTracker]) -> CategoryStatistics {
    let successful: Vec<u64> = trackers
        .iter()
        .filter(|t| t.is_success())
        .filter_map(|t| t.latency_ms())
        .collect();
    let failed = trackers
        .iter()
        .filter(|t| t.status == TrackerStatus::Failed)
        .count();
    let average_latency_ms = if successful.is_empty() {
        0.0
    } else {
        successful.iter().sum::<u64>() as f64 / successful.len() as f64
    };

    CategoryStatistics {
        total: trackers.len(),
        successful: successful.len(),
        failed,
        success_rate: rate(successful.len(), trackers.len()),
        average_latency_ms,
    }
}

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub catalog_size: usize,
    pub enabled: usize,
    /// Catalog entries with a bound agent.
    pub bound: usize,
    /// Bound agents currently inside `run()`.
    pub running: usize,
    /// Trackers retained in history.
    pub total_executions: usize,
    pub last_execution_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub(crate) struct StatusCounts {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub(crate) fn tally<'a>(trackers: impl IntoIterator<Item = &'a ExecutionTracker>) -> Self {
        let mut counts = Self::default();
        for tracker in trackers {
            match tracker.status {
                TrackerStatus::Success => counts.successful += 1,
                TrackerStatus::Failed => counts.failed += 1,
                TrackerStatus::Pending | TrackerStatus::Running => counts.skipped += 1,
            }
        }
        counts
    }
}

/// Percentage in `[0, 100]`; 0 for an empty population.
pub(crate) fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
