use crate::catalog::{AgentCategory, Catalog, UnitDescriptor};
use crate::config::OrchestratorConfig;
use crate::defaults::default_catalog;
use crate::types::{
    rate, CategoryExecutionResult, ExecutionTracker, HistoryFilter, OrchestrationResult,
    OrchestrationSummary, OrchestratorStatistics, OrchestratorStatus, StatusCounts,
};
use agentdeck_agent::{AgentStatus, ManagedAgent};
use agentdeck_core::{AgentdeckError, AgentdeckResult};
use chrono::Utc;
use futures_util::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Trackers of one orchestration run. Dependency checks only look here.
struct RunScope {
    execution_id: Uuid,
    trackers: Mutex<Vec<ExecutionTracker>>,
}

impl RunScope {
    fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            trackers: Mutex::new(Vec::new()),
        }
    }

    /// Dependencies without a `success` tracker in this run so far.
    fn missing(&self, dependencies: &[String]) -> Vec<String> {
        let trackers = self.trackers.lock();
        dependencies
            .iter()
            .filter(|dep| !trackers.iter().any(|t| &t.agent_id == *dep && t.is_success()))
            .cloned()
            .collect()
    }

    fn snapshot(&self) -> Vec<ExecutionTracker> {
        self.trackers.lock().clone()
    }
}

/// Append-only sink shared by concurrently running invocations.
#[derive(Clone)]
struct Recorder {
    scope: Arc<RunScope>,
    history: Arc<Mutex<VecDeque<ExecutionTracker>>>,
    max_history: usize,
}

impl Recorder {
    fn execution_id(&self) -> Uuid {
        self.scope.execution_id
    }

    fn record(&self, tracker: ExecutionTracker) {
        self.scope.trackers.lock().push(tracker.clone());
        let mut history = self.history.lock();
        history.push_back(tracker);
        while history.len() > self.max_history {
            history.pop_front();
        }
    }
}

/// Dependency-aware orchestrator over a static [`Catalog`].
///
/// Categories run strictly one after another in [`AgentCategory::ORDER`];
/// every enabled entry of a category is launched at once and the category
/// ends when all of them have settled. An entry runs only if each of its
/// dependencies already has a `success` tracker in the current run.
///
/// Dependencies inside the same category are checked at launch, while the
/// dependency itself may still be running, so such dependents usually fail
/// with "Dependencies not satisfied".
pub struct Orchestrator {
    catalog: Catalog,
    config: OrchestratorConfig,
    bindings: HashMap<String, Arc<ManagedAgent>>,
    scope: Mutex<Arc<RunScope>>,
    history: Arc<Mutex<VecDeque<ExecutionTracker>>>,
    last_execution_id: Mutex<Option<Uuid>>,
}

impl Orchestrator {
    /// Create an orchestrator over the given catalog with default tunables.
    pub fn new(catalog: Catalog) -> Self {
        for dangling in catalog.dangling_dependencies() {
            warn!(
                agent_id = %dangling.agent_id,
                missing = %dangling.missing,
                "Catalog dependency references an unknown id; dependent can never run"
            );
        }
        for (dependent, dependency) in catalog.same_category_dependencies() {
            warn!(
                agent_id = %dependent,
                dependency = %dependency,
                "Dependency within the same category is not ordered"
            );
        }

        if catalog.has_cycle() {
            warn!("Catalog dependency graph contains a cycle; entries on it can never run");
        }

        Self {
            catalog,
            config: OrchestratorConfig::default(),
            bindings: HashMap::new(),
            scope: Mutex::new(Arc::new(RunScope::new())),
            history: Arc::new(Mutex::new(VecDeque::new())),
            last_execution_id: Mutex::new(None),
        }
    }

    /// Create an orchestrator over the built-in dashboard catalog.
    pub fn with_default_catalog() -> AgentdeckResult<Self> {
        Ok(Self::new(default_catalog()?))
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Bind a live agent to a catalog id. Rebinding replaces the old agent.
    pub fn bind(&mut self, id: &str, agent: Arc<ManagedAgent>) -> AgentdeckResult<()> {
        if !self.catalog.contains(id) {
            return Err(AgentdeckError::Catalog(format!("unknown agent id '{id}'")));
        }
        if self.bindings.insert(id.to_string(), agent).is_some() {
            warn!(agent_id = %id, "Replaced agent binding");
        } else {
            info!(agent_id = %id, "Bound agent");
        }
        Ok(())
    }

    pub fn unbind(&mut self, id: &str) -> Option<Arc<ManagedAgent>> {
        self.bindings.remove(id)
    }

    pub fn bound_agent(&self, id: &str) -> Option<&Arc<ManagedAgent>> {
        self.bindings.get(id)
    }

    /// Drop every binding and all history.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.clear_history();
    }

    fn recorder(&self) -> Recorder {
        self.recorder_in(self.scope.lock().clone())
    }

    fn recorder_in(&self, scope: Arc<RunScope>) -> Recorder {
        Recorder {
            scope,
            history: self.history.clone(),
            max_history: self.config.max_history.max(1),
        }
    }

    /// Start a fresh dependency scope for callers driving [`run_category`]
    /// or [`run_agent`] themselves. [`run_all`] does this on its own.
    ///
    /// Until a new scope is started, every tracker recorded by those calls
    /// accumulates in the current one and keeps satisfying dependencies.
    ///
    /// [`run_category`]: Orchestrator::run_category
    /// [`run_agent`]: Orchestrator::run_agent
    /// [`run_all`]: Orchestrator::run_all
    pub fn begin_run(&self) -> Uuid {
        let scope = Arc::new(RunScope::new());
        let execution_id = scope.execution_id;
        *self.scope.lock() = scope;
        *self.last_execution_id.lock() = Some(execution_id);
        info!(execution_id = %execution_id, "Started new run scope");
        execution_id
    }

    /// Run a single catalog entry in the current run, without checking its
    /// dependencies.
    pub async fn run_agent(&self, id: &str) -> AgentdeckResult<ExecutionTracker> {
        let descriptor = self
            .catalog
            .get(id)
            .ok_or_else(|| AgentdeckError::Catalog(format!("unknown agent id '{id}'")))?
            .clone();
        let agent = self.bindings.get(id).cloned();
        Ok(Self::execute(descriptor, agent, self.recorder()).await)
    }

    async fn execute(
        descriptor: UnitDescriptor,
        agent: Option<Arc<ManagedAgent>>,
        recorder: Recorder,
    ) -> ExecutionTracker {
        let tracker =
            ExecutionTracker::start(recorder.execution_id(), &descriptor.id, descriptor.category);

        let tracker = match agent {
            _ if !descriptor.enabled => {
                tracker.skip(AgentdeckError::Disabled(descriptor.id.clone()).to_string())
            }
            None => {
                warn!(agent_id = %descriptor.id, "No agent bound, skipping");
                tracker.skip(format!("No agent bound to '{}'", descriptor.id))
            }
            Some(agent) => tracker.finish(agent.run().await),
        };

        recorder.record(tracker.clone());
        tracker
    }

    /// Dependency gate followed by the invocation itself.
    async fn evaluate(
        descriptor: UnitDescriptor,
        agent: Option<Arc<ManagedAgent>>,
        recorder: Recorder,
    ) -> ExecutionTracker {
        let missing = recorder.scope.missing(&descriptor.dependencies);
        if !missing.is_empty() {
            warn!(
                agent_id = %descriptor.id,
                missing = ?missing,
                "Dependencies not satisfied, skipping invocation"
            );
            let tracker =
                ExecutionTracker::start(recorder.execution_id(), &descriptor.id, descriptor.category)
                    .fail(AgentdeckError::DependencyUnsatisfied { missing }.to_string());
            recorder.record(tracker.clone());
            return tracker;
        }
        Self::execute(descriptor, agent, recorder).await
    }

    /// Run every enabled entry of one category concurrently and wait for
    /// all of them, within the current run scope. Trackers come back in
    /// completion order.
    pub async fn run_category(&self, category: AgentCategory) -> CategoryExecutionResult {
        self.run_category_in(self.recorder(), category).await
    }

    async fn run_category_in(
        &self,
        recorder: Recorder,
        category: AgentCategory,
    ) -> CategoryExecutionResult {
        let start = Instant::now();
        let entries: Vec<UnitDescriptor> = self
            .catalog
            .in_category(category)
            .into_iter()
            .filter(|d| d.enabled)
            .cloned()
            .collect();

        info!(
            execution_id = %recorder.execution_id(),
            category = %category,
            count = entries.len(),
            "Category started"
        );

        let mut in_flight = FuturesUnordered::new();
        for descriptor in entries {
            let id = descriptor.id.clone();
            let agent = self.bindings.get(&id).cloned();
            let handle = tokio::spawn(Self::evaluate(descriptor, agent, recorder.clone()));
            in_flight.push(async move { (id, handle.await) });
        }

        let mut trackers = Vec::with_capacity(in_flight.len());
        while let Some((id, joined)) = in_flight.next().await {
            trackers.push(settle(&recorder, id, category, joined));
        }

        let result = CategoryExecutionResult::from_trackers(
            category,
            trackers,
            start.elapsed().as_millis() as u64,
        );
        info!(
            execution_id = %recorder.execution_id(),
            category = %category,
            successful = result.successful,
            failed = result.failed,
            duration_ms = result.duration_ms,
            "Category finished"
        );
        result
    }

    /// Run every category in order within a fresh dependency scope.
    ///
    /// The scope belongs to this call alone, so overlapping runs never see
    /// each other's trackers. It also becomes the current scope for later
    /// direct `run_category`/`run_agent` calls.
    pub async fn run_all(&self) -> OrchestrationResult {
        let scope = Arc::new(RunScope::new());
        let execution_id = scope.execution_id;
        *self.scope.lock() = scope.clone();
        *self.last_execution_id.lock() = Some(execution_id);
        let recorder = self.recorder_in(scope.clone());

        let started_at = Utc::now();
        let start = Instant::now();
        info!(execution_id = %execution_id, "Orchestration run started");

        let categories: Vec<AgentCategory> = self
            .catalog
            .populated_categories()
            .into_iter()
            .filter(|c| self.catalog.in_category(*c).iter().any(|d| d.enabled))
            .collect();

        let mut results = Vec::with_capacity(categories.len());
        for (pos, category) in categories.into_iter().enumerate() {
            if pos > 0 && self.config.category_pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.category_pause_ms)).await;
            }
            results.push(self.run_category_in(recorder.clone(), category).await);
        }

        let history = scope.snapshot();
        let counts = StatusCounts::tally(&history);
        let summary = OrchestrationSummary {
            total: history.len(),
            successful: counts.successful,
            failed: counts.failed,
            skipped: counts.skipped,
            success_rate: rate(counts.successful, history.len()),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            execution_id = %execution_id,
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            success_rate = summary.success_rate,
            duration_ms = summary.duration_ms,
            "Orchestration run finished"
        );

        OrchestrationResult {
            execution_id,
            started_at,
            finished_at: Utc::now(),
            summary,
            categories: results,
            history,
        }
    }

    pub fn status(&self) -> OrchestratorStatus {
        let bound: Vec<&Arc<ManagedAgent>> = self
            .bindings
            .iter()
            .filter(|(id, _)| self.catalog.contains(id))
            .map(|(_, agent)| agent)
            .collect();
        OrchestratorStatus {
            catalog_size: self.catalog.len(),
            enabled: self.catalog.enabled_count(),
            bound: bound.len(),
            running: bound
                .iter()
                .filter(|a| a.metrics().status == AgentStatus::Running)
                .count(),
            total_executions: self.history.lock().len(),
            last_execution_id: *self.last_execution_id.lock(),
        }
    }

    /// Retained trackers matching the filter, oldest first.
    pub fn history(&self, filter: &HistoryFilter) -> Vec<ExecutionTracker> {
        let history = self.history.lock();
        let mut matching: Vec<ExecutionTracker> =
            history.iter().filter(|t| filter.matches(t)).cloned().collect();
        if let Some(limit) = filter.limit {
            let excess = matching.len().saturating_sub(limit);
            matching = matching.split_off(excess);
        }
        matching
    }

    pub fn statistics(&self) -> OrchestratorStatistics {
        let history: Vec<ExecutionTracker> = self.history.lock().iter().cloned().collect();
        OrchestratorStatistics::from_history(&history)
    }

    /// Forget all trackers and start a fresh dependency scope.
    pub fn clear_history(&self) {
        self.history.lock().clear();
        *self.scope.lock() = Arc::new(RunScope::new());
        *self.last_execution_id.lock() = None;
        info!("Orchestrator history cleared");
    }
}

/// Tracker of a spawned invocation. A task that died without producing
/// one is recorded as failed.
fn settle(
    recorder: &Recorder,
    agent_id: String,
    category: AgentCategory,
    joined: Result<ExecutionTracker, JoinError>,
) -> ExecutionTracker {
    match joined {
        Ok(tracker) => tracker,
        Err(e) => {
            error!(agent_id = %agent_id, error = %e, "Agent task aborted");
            let tracker = ExecutionTracker::start(recorder.execution_id(), agent_id, category)
                .fail(AgentdeckError::Execution(e.to_string()).to_string());
            recorder.record(tracker.clone());
            tracker
        }
    }
}
