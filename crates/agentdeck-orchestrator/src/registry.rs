use crate::config::{default_history_capacity, RegistryConfig};
use agentdeck_agent::{AgentStatus, ManagedAgent, RunResult};
use agentdeck_core::{AgentdeckError, AgentdeckResult};
use futures_util::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info, warn};

/// Aggregate view of the live status of every registered agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub total: usize,
    pub idle: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Flat, name-keyed collection of agents with direct execution and a
/// bounded run history per agent. Knows nothing about dependencies.
pub struct AgentRegistry {
    agents: Vec<Arc<ManagedAgent>>,
    history: Mutex<HashMap<String, VecDeque<RunResult>>>,
    history_capacity: usize,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::with_history_capacity(default_history_capacity())
    }

    pub fn with_config(config: &RegistryConfig) -> Self {
        Self::with_history_capacity(config.history_capacity)
    }

    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            agents: Vec::new(),
            history: Mutex::new(HashMap::new()),
            history_capacity: history_capacity.max(1),
        }
    }

    pub fn register(&mut self, agent: Arc<ManagedAgent>) -> AgentdeckResult<()> {
        let name = agent.name();
        if name.trim().is_empty() {
            return Err(AgentdeckError::Config(
                "agent name must not be empty".to_string(),
            ));
        }
        if self.get(&name).is_some() {
            return Err(AgentdeckError::DuplicateName(name));
        }
        info!(agent = %name, "Registered agent");
        self.agents.push(agent);
        Ok(())
    }

    /// Register several agents. Stops at the first error; agents registered
    /// before it stay registered.
    pub fn register_all(
        &mut self,
        agents: impl IntoIterator<Item = Arc<ManagedAgent>>,
    ) -> AgentdeckResult<usize> {
        let mut count = 0;
        for agent in agents {
            self.register(agent)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ManagedAgent>> {
        self.agents.iter().find(|a| a.name() == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Run one agent and record the result in its history.
    pub async fn run_agent(&self, name: &str) -> AgentdeckResult<RunResult> {
        let agent = self
            .get(name)
            .cloned()
            .ok_or_else(|| AgentdeckError::NotFound(name.to_string()))?;
        let result = agent.run().await;
        self.record(result.clone());
        Ok(result)
    }

    /// Run every agent one after another, in registration order.
    pub async fn run_all(&self) -> Vec<RunResult> {
        info!(count = self.agents.len(), "Running all agents sequentially");
        let mut results = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let result = Self::invoke(agent.clone()).await;
            self.record(result.clone());
            results.push(result);
        }
        results
    }

    /// Run every agent at once and wait for all of them.
    pub async fn run_all_concurrently(&self) -> Vec<RunResult> {
        info!(count = self.agents.len(), "Running all agents concurrently");
        let results = join_all(self.agents.iter().cloned().map(Self::invoke)).await;
        for result in &results {
            self.record(result.clone());
        }
        results
    }

    /// Run an agent on its own task so a crash becomes a failed result
    /// instead of tearing down the batch.
    async fn invoke(agent: Arc<ManagedAgent>) -> RunResult {
        let name = agent.name();
        settle(name, tokio::spawn(async move { agent.run().await }).await)
    }

    fn record(&self, result: RunResult) {
        let mut history = self.history.lock();
        let entries = history.entry(result.agent.clone()).or_default();
        entries.push_back(result);
        while entries.len() > self.history_capacity {
            entries.pop_front();
        }
    }

    /// Counts derived from each agent's live metrics.
    pub fn status(&self) -> RegistryStatus {
        let mut status = RegistryStatus {
            total: self.agents.len(),
            ..RegistryStatus::default()
        };
        for agent in &self.agents {
            match agent.metrics().status {
                AgentStatus::Idle => status.idle += 1,
                AgentStatus::Running => status.running += 1,
                AgentStatus::Completed => status.completed += 1,
                AgentStatus::Failed => status.failed += 1,
            }
        }
        status
    }

    /// Retained results for one agent, oldest first.
    pub fn history(&self, name: &str) -> Vec<RunResult> {
        self.history
            .lock()
            .get(name)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    pub fn unregister(&mut self, name: &str) -> AgentdeckResult<()> {
        let before = self.agents.len();
        self.agents.retain(|a| a.name() != name);
        if self.agents.len() == before {
            return Err(AgentdeckError::NotFound(name.to_string()));
        }
        self.history.lock().remove(name);
        info!(agent = %name, "Unregistered agent");
        Ok(())
    }

    pub fn unregister_all(&mut self) {
        if !self.agents.is_empty() {
            warn!(count = self.agents.len(), "Unregistering all agents");
        }
        self.agents.clear();
    }

    pub fn clear_history(&self, name: &str) {
        self.history.lock().remove(name);
    }

    pub fn clear_all_history(&self) {
        self.history.lock().clear();
    }

    /// Drop every agent and every retained result.
    pub fn reset(&mut self) {
        self.unregister_all();
        self.clear_all_history();
    }
}

/// Result of a spawned run. A task that died without producing one becomes
/// a synthetic failure.
fn settle(name: String, joined: Result<RunResult, JoinError>) -> RunResult {
    match joined {
        Ok(result) => result,
        Err(e) => {
            error!(agent = %name, error = %e, "Agent task aborted");
            RunResult::synthetic_failure(name, AgentdeckError::Execution(e.to_string()).to_string())
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
