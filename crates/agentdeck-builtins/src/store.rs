use agentdeck_core::AgentdeckResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Destination of an agent's `publish` phase.
/// Implementations can be in-memory (testing) or backed by a real sink.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store `record` under `key`, replacing any previous record.
    async fn put(&self, key: &str, record: Value) -> AgentdeckResult<()>;
    /// Fetch the record stored under `key`.
    async fn get(&self, key: &str) -> AgentdeckResult<Option<Value>>;
    /// All keys currently stored, sorted.
    async fn keys(&self) -> AgentdeckResult<Vec<String>>;
}

/// In-memory record store for tests and short-lived runs.
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Value>>,
}

impl InMemoryRecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether nothing has been published yet.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, key: &str, record: Value) -> AgentdeckResult<()> {
        self.records.write().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn get(&self, key: &str) -> AgentdeckResult<Option<Value>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn keys(&self) -> AgentdeckResult<Vec<String>> {
        let mut keys: Vec<String> = self.records.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
