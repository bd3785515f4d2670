use agentdeck_core::AgentdeckResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Where an agent's `collect` phase reads its records from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Records for the agent with catalog id `agent_id`.
    async fn fetch(&self, agent_id: &str) -> AgentdeckResult<Vec<Value>>;
}

/// Fixed records, optionally overridden per agent id.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    fallback: Vec<Value>,
    per_agent: HashMap<String, Vec<Value>>,
}

impl StaticDataSource {
    /// Serve `fallback` to every agent without an override.
    pub fn new(fallback: Vec<Value>) -> Self {
        Self {
            fallback,
            per_agent: HashMap::new(),
        }
    }

    /// Serve `records` to `agent_id` instead of the fallback.
    pub fn with_records(mut self, agent_id: impl Into<String>, records: Vec<Value>) -> Self {
        self.per_agent.insert(agent_id.into(), records);
        self
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch(&self, agent_id: &str) -> AgentdeckResult<Vec<Value>> {
        Ok(self
            .per_agent
            .get(agent_id)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Deterministic sample records derived from the agent id alone, so two runs
/// of the same agent always see the same input.
#[derive(Debug, Clone)]
pub struct SampleDataSource {
    records_per_agent: usize,
}

impl SampleDataSource {
    /// Generate `records_per_agent` records per fetch.
    pub fn new(records_per_agent: usize) -> Self {
        Self { records_per_agent }
    }
}

impl Default for SampleDataSource {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl DataSource for SampleDataSource {
    async fn fetch(&self, agent_id: &str) -> AgentdeckResult<Vec<Value>> {
        Ok(sample_records(agent_id, self.records_per_agent))
    }
}

/// `count` records whose values are a pure function of `agent_id`.
pub fn sample_records(agent_id: &str, count: usize) -> Vec<Value> {
    // FNV-1a
    let seed = agent_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });
    (0..count as u64)
        .map(|i| {
            serde_json::json!({
                "agent": agent_id,
                "sequence": i,
                "value": seed.wrapping_add(i.wrapping_mul(7_919)) % 100,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_records_are_deterministic() {
        let first = sample_records("billing", 4);
        let second = sample_records("billing", 4);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_ne!(first, sample_records("crm-sync", 4));
        assert!(first.iter().all(|r| r["value"].as_u64().unwrap() < 100));
    }

    #[tokio::test]
    async fn test_static_source_overrides() {
        let source = StaticDataSource::new(vec![serde_json::json!({"value": 1})])
            .with_records("seo-audit", vec![serde_json::json!({"value": 9})]);
        assert_eq!(source.fetch("seo-audit").await.unwrap()[0]["value"], 9);
        assert_eq!(source.fetch("billing").await.unwrap()[0]["value"], 1);
    }
}
