//! Registry tests: direct execution, bulk runs and bounded history.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use agentdeck_agent::{Agent, ManagedAgent, RunStatus, UnitConfig};
use agentdeck_core::{AgentdeckError, AgentdeckResult};
use agentdeck_orchestrator::{AgentRegistry, RegistryStatus};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Returns its own call number as payload; optionally fails or sleeps.
struct Counter {
    calls: AtomicU32,
    delay_ms: u64,
    fails: bool,
}

#[async_trait]
impl Agent for Counter {
    async fn collect(&self) -> AgentdeckResult<Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        Ok(Value::from(n))
    }

    async fn process(&self, raw: Value) -> AgentdeckResult<Value> {
        if self.fails {
            return Err(AgentdeckError::Execution("quota exceeded".into()));
        }
        Ok(raw)
    }

    async fn publish(&self, _output: &Value) -> AgentdeckResult<()> {
        Ok(())
    }
}

fn agent(name: &str, delay_ms: u64, fails: bool) -> Arc<ManagedAgent> {
    let inner = Arc::new(Counter {
        calls: AtomicU32::new(0),
        delay_ms,
        fails,
    });
    Arc::new(ManagedAgent::new(UnitConfig::new(name).with_max_retries(0), inner).unwrap())
}

#[tokio::test]
async fn history_evicts_oldest_after_capacity() {
    let mut registry = AgentRegistry::new();
    registry.register(agent("uptime", 0, false)).unwrap();

    for _ in 0..51 {
        registry.run_agent("uptime").await.unwrap();
    }

    let history = registry.history("uptime");
    assert_eq!(history.len(), 50);
    // call #1 was evicted, #2 is now the oldest
    assert_eq!(history.first().unwrap().payload, Some(Value::from(2)));
    assert_eq!(history.last().unwrap().payload, Some(Value::from(51)));
}

#[tokio::test]
async fn run_all_is_sequential_in_registration_order() {
    let mut registry = AgentRegistry::new();
    registry
        .register_all(vec![
            agent("billing", 20, false),
            agent("crm-sync", 0, true),
            agent("seo-audit", 20, false),
        ])
        .unwrap();

    let start = Instant::now();
    let results = registry.run_all().await;

    assert!(start.elapsed() >= Duration::from_millis(40));
    let names: Vec<&str> = results.iter().map(|r| r.agent.as_str()).collect();
    assert_eq!(names, vec!["billing", "crm-sync", "seo-audit"]);
    assert_eq!(results[1].status, RunStatus::Failed);
    assert!(results[1].error.as_deref().unwrap().contains("quota exceeded"));
    assert_eq!(results[2].status, RunStatus::Completed);

    assert_eq!(registry.history("crm-sync").len(), 1);
    assert_eq!(
        registry.status(),
        RegistryStatus {
            total: 3,
            idle: 0,
            running: 0,
            completed: 2,
            failed: 1,
        }
    );
}

#[tokio::test]
async fn run_all_concurrently_overlaps_agents() {
    let mut registry = AgentRegistry::new();
    for name in ["backup-monitor", "ssl-monitor", "log-analyzer", "uptime-monitor"] {
        registry.register(agent(name, 100, false)).unwrap();
    }

    let start = Instant::now();
    let results = registry.run_all_concurrently().await;
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.status == RunStatus::Completed));
    assert!(elapsed < Duration::from_millis(300), "took {elapsed:?}");
    for name in registry.names() {
        assert_eq!(registry.history(&name).len(), 1);
    }
}

#[tokio::test]
async fn disabled_agent_in_bulk_run_does_not_abort_batch() {
    let mut registry = AgentRegistry::new();
    let disabled = agent("travel-advisory", 0, false);
    disabled.set_enabled(false);
    registry.register(disabled).unwrap();
    registry.register(agent("health-tracker", 0, false)).unwrap();

    let results = registry.run_all().await;

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].error.as_deref(),
        Some("Agent 'travel-advisory' is disabled")
    );
    assert_eq!(results[1].status, RunStatus::Completed);
    // a disabled agent keeps its idle status
    assert_eq!(registry.status().idle, 1);
}

#[tokio::test]
async fn clear_and_reset() {
    let mut registry = AgentRegistry::with_history_capacity(5);
    registry.register(agent("a", 0, false)).unwrap();
    registry.register(agent("b", 0, false)).unwrap();
    registry.run_all().await;

    registry.clear_history("a");
    assert!(registry.history("a").is_empty());
    assert_eq!(registry.history("b").len(), 1);

    registry.clear_all_history();
    assert!(registry.history("b").is_empty());

    registry.run_all().await;
    registry.reset();
    assert!(registry.is_empty());
    assert!(registry.history("a").is_empty());
    assert_eq!(registry.status(), RegistryStatus::default());
}

struct Panicking;

#[async_trait]
impl Agent for Panicking {
    async fn collect(&self) -> AgentdeckResult<Value> {
        Ok(Value::Null)
    }

    async fn process(&self, _raw: Value) -> AgentdeckResult<Value> {
        panic!("index out of range");
    }

    async fn publish(&self, _output: &Value) -> AgentdeckResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn panicking_agent_fails_alone_in_concurrent_batch() {
    let mut registry = AgentRegistry::new();
    let crashing = ManagedAgent::new(
        UnitConfig::new("log-analyzer").with_max_retries(0),
        Arc::new(Panicking),
    )
    .unwrap();
    registry.register(Arc::new(crashing)).unwrap();
    registry.register(agent("ssl-monitor", 10, false)).unwrap();

    let results = registry.run_all_concurrently().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, RunStatus::Failed);
    assert_eq!(results[0].attempts, 1);
    assert!(results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("index out of range"));
    assert_eq!(results[1].status, RunStatus::Completed);
    assert_eq!(registry.history("log-analyzer").len(), 1);
    assert_eq!(registry.status().failed, 1);
}
