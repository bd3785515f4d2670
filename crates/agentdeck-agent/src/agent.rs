use agentdeck_core::AgentdeckResult;
use async_trait::async_trait;
use serde_json::Value;

/// Trait that every concrete agent implements.
///
/// The three phases are always invoked in order by [`crate::ManagedAgent::run`],
/// and an error in any phase aborts the rest of that attempt. Implementations
/// never call each other's phases directly.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Gather the raw input for this run.
    async fn collect(&self) -> AgentdeckResult<Value>;

    /// Turn the collected data into the agent's output.
    async fn process(&self, raw: Value) -> AgentdeckResult<Value>;

    /// Write the output to its destination.
    async fn publish(&self, output: &Value) -> AgentdeckResult<()>;
}
