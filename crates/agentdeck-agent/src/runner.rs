use crate::agent::Agent;
use crate::config::UnitConfig;
use crate::metrics::UnitMetrics;
use crate::result::RunResult;
use crate::retry::RetryPolicy;
use agentdeck_core::{AgentdeckError, AgentdeckResult, Phase};
use chrono::Utc;
use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// An [`Agent`] wrapped with its configuration, metrics and the uniform
/// execution policy (timeout per attempt, bounded retries, bookkeeping).
pub struct ManagedAgent {
    config: RwLock<UnitConfig>,
    metrics: Mutex<UnitMetrics>,
    last_run: Mutex<Option<RunResult>>,
    retry: RetryPolicy,
    agent: Arc<dyn Agent>,
}

impl ManagedAgent {
    /// Attach a validated configuration to an agent implementation.
    pub fn new(config: UnitConfig, agent: Arc<dyn Agent>) -> AgentdeckResult<Self> {
        config.validate()?;
        debug!(agent = %config.name, "Configured agent");
        Ok(Self {
            config: RwLock::new(config),
            metrics: Mutex::new(UnitMetrics::default()),
            last_run: Mutex::new(None),
            retry: RetryPolicy::default(),
            agent,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn name(&self) -> String {
        self.config.read().name.clone()
    }

    pub fn config(&self) -> UnitConfig {
        self.config.read().clone()
    }

    pub fn metrics(&self) -> UnitMetrics {
        self.metrics.lock().clone()
    }

    pub fn last_run(&self) -> Option<RunResult> {
        self.last_run.lock().clone()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.config.write().enabled = enabled;
    }

    pub fn set_max_retries(&self, max_retries: u32) {
        self.config.write().max_retries = max_retries;
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.config.write().description = description.into();
    }

    pub fn set_timeout_ms(&self, timeout_ms: u64) -> AgentdeckResult<()> {
        let mut config = self.config.write();
        if timeout_ms == 0 {
            return Err(AgentdeckError::Config(format!(
                "agent '{}' must have a positive timeout",
                config.name
            )));
        }
        config.timeout_ms = timeout_ms;
        Ok(())
    }

    /// Execute the agent once, with retries.
    ///
    /// Never returns an error: disabled state, phase errors, timeouts and
    /// panics all end up as a failed [`RunResult`]. Metrics and `last_run`
    /// are updated exactly once per call, except for a disabled agent which
    /// touches neither.
    pub async fn run(&self) -> RunResult {
        let config = self.config();

        if !config.enabled {
            let err = AgentdeckError::Disabled(config.name.clone());
            warn!(agent = %config.name, "Refusing to run disabled agent");
            return RunResult::failed(&config.name, Utc::now(), 0, err.to_string());
        }

        self.metrics.lock().mark_running();
        let started_at = Utc::now();
        let max_attempts = config.max_attempts();

        info!(agent = %config.name, max_attempts, "Agent run started");

        let mut attempt: u32 = 0;
        let outcome = loop {
            attempt += 1;
            match self.attempt(config.timeout_ms).await {
                Ok(payload) => break Ok(payload),
                Err(e) if attempt < max_attempts => {
                    let delay = self.retry.delay_ms(attempt - 1);
                    warn!(
                        agent = %config.name,
                        attempt,
                        max_attempts,
                        delay_ms = delay,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    if delay > 0 {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
                Err(e) => break Err(e),
            }
        };

        let result = match outcome {
            Ok(payload) => RunResult::completed(&config.name, started_at, attempt, payload),
            Err(e) => RunResult::failed(&config.name, started_at, attempt, e.to_string()),
        };

        {
            let mut metrics = self.metrics.lock();
            if result.is_success() {
                metrics.record_success(result.latency_ms, result.finished_at);
            } else {
                metrics.record_failure(result.latency_ms, result.finished_at);
            }
        }
        *self.last_run.lock() = Some(result.clone());

        match &result.error {
            None => info!(
                agent = %config.name,
                attempts = attempt,
                latency_ms = result.latency_ms,
                "Agent run completed"
            ),
            Some(e) => error!(
                agent = %config.name,
                attempts = attempt,
                latency_ms = result.latency_ms,
                error = %e,
                "Agent run failed"
            ),
        }

        result
    }

    /// One attempt of the three-phase body under the timeout budget.
    async fn attempt(&self, timeout_ms: u64) -> AgentdeckResult<Value> {
        let body = AssertUnwindSafe(self.execute_phases()).catch_unwind();
        match tokio::time::timeout(Duration::from_millis(timeout_ms), body).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => Err(AgentdeckError::Execution(format!(
                "agent panicked: {}",
                panic_message(panic.as_ref())
            ))),
            Err(_) => Err(AgentdeckError::Timeout { timeout_ms }),
        }
    }

    async fn execute_phases(&self) -> AgentdeckResult<Value> {
        let raw = self
            .agent
            .collect()
            .await
            .map_err(|e| in_phase(Phase::Collect, e))?;
        let output = self
            .agent
            .process(raw)
            .await
            .map_err(|e| in_phase(Phase::Process, e))?;
        self.agent
            .publish(&output)
            .await
            .map_err(|e| in_phase(Phase::Publish, e))?;
        Ok(output)
    }
}

impl std::fmt::Debug for ManagedAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedAgent")
            .field("config", &*self.config.read())
            .field("metrics", &*self.metrics.lock())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

fn in_phase(phase: Phase, err: AgentdeckError) -> AgentdeckError {
    match err {
        AgentdeckError::Phase { .. } => err,
        other => AgentdeckError::phase(phase, other),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
