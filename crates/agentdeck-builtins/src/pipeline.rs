use crate::source::DataSource;
use crate::store::RecordStore;
use agentdeck_agent::Agent;
use agentdeck_core::{AgentdeckError, AgentdeckResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Key under which an agent's summary is published.
pub fn record_key(agent_id: &str) -> String {
    format!("agents/{agent_id}")
}

/// Generic collect/summarise/publish agent.
///
/// `collect` reads the agent's records from a [`DataSource`], `process`
/// reduces them to a summary of their numeric `value` fields and `publish`
/// writes that summary to a [`RecordStore`] under [`record_key`].
pub struct PipelineAgent {
    id: String,
    source: Arc<dyn DataSource>,
    store: Arc<dyn RecordStore>,
}

impl PipelineAgent {
    /// A pipeline for catalog entry `id`.
    pub fn new(
        id: impl Into<String>,
        source: Arc<dyn DataSource>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            store,
        }
    }

    /// Catalog id this pipeline reads and publishes for.
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Agent for PipelineAgent {
    async fn collect(&self) -> AgentdeckResult<Value> {
        let records = self.source.fetch(&self.id).await?;
        debug!(agent_id = %self.id, count = records.len(), "Collected records");
        Ok(Value::Array(records))
    }

    async fn process(&self, raw: Value) -> AgentdeckResult<Value> {
        let records = match raw {
            Value::Array(records) => records,
            other => {
                return Err(AgentdeckError::Execution(format!(
                    "expected a list of records, got {other}"
                )))
            }
        };

        let values: Vec<f64> = records
            .iter()
            .filter_map(|r| r.get("value").and_then(Value::as_f64))
            .collect();
        let total: f64 = values.iter().sum();
        let mean = if values.is_empty() {
            0.0
        } else {
            total / values.len() as f64
        };
        let max = values.iter().copied().fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |m| m.max(v)))
        });

        Ok(json!({
            "agent": self.id,
            "records": records.len(),
            "total": total,
            "mean": mean,
            "max": max,
        }))
    }

    async fn publish(&self, output: &Value) -> AgentdeckResult<()> {
        self.store.put(&record_key(&self.id), output.clone()).await
    }
}
