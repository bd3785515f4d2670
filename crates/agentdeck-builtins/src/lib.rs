//! Built-in agents for the agentdeck catalog.
//!
//! Every catalog entry gets a [`PipelineAgent`] that reads deterministic
//! sample records, summarises them and publishes the summary to a shared
//! [`RecordStore`].
//!
//! # Main entry points
//!
//! - [`register_builtins()`] — Bind a built-in agent to every entry of an orchestrator's catalog.
//! - [`register_registry_builtins()`] — Register the same agents in a flat registry.
//! - [`builtin_agent()`] — Build the managed agent for a single catalog entry.

/// Execution policy shared by the built-in agents.
pub mod defaults;
/// Collect/summarise/publish agent.
pub mod pipeline;
/// Input records for the collect phase.
pub mod source;
/// Publish targets.
pub mod store;

pub use defaults::AgentDefaults;
pub use pipeline::{record_key, PipelineAgent};
pub use source::{sample_records, DataSource, SampleDataSource, StaticDataSource};
pub use store::{InMemoryRecordStore, RecordStore};

use agentdeck_agent::ManagedAgent;
use agentdeck_core::AgentdeckResult;
use agentdeck_orchestrator::{AgentRegistry, Catalog, Orchestrator, UnitDescriptor};
use std::sync::Arc;
use tracing::info;

/// Build the managed agent for `descriptor`.
///
/// The agent is named after the catalog id and starts disabled when the
/// catalog entry is disabled.
pub fn builtin_agent(
    descriptor: &UnitDescriptor,
    source: Arc<dyn DataSource>,
    store: Arc<dyn RecordStore>,
    defaults: &AgentDefaults,
) -> AgentdeckResult<Arc<ManagedAgent>> {
    let config = defaults
        .unit_config(&descriptor.id)
        .with_description(descriptor.name.clone())
        .with_enabled(descriptor.enabled);
    let pipeline = PipelineAgent::new(descriptor.id.clone(), source, store);
    let agent = ManagedAgent::new(config, Arc::new(pipeline))?
        .with_retry_policy(defaults.retry.clone());
    Ok(Arc::new(agent))
}

/// Bind a built-in agent to every entry of the orchestrator's catalog.
/// Returns the number of bindings made.
pub fn register_builtins(
    orchestrator: &mut Orchestrator,
    store: Arc<dyn RecordStore>,
    defaults: &AgentDefaults,
) -> AgentdeckResult<usize> {
    let source: Arc<dyn DataSource> = Arc::new(SampleDataSource::default());
    let descriptors = orchestrator.catalog().descriptors().to_vec();
    for descriptor in &descriptors {
        let agent = builtin_agent(descriptor, source.clone(), store.clone(), defaults)?;
        orchestrator.bind(&descriptor.id, agent)?;
    }
    info!(count = descriptors.len(), "Bound built-in agents");
    Ok(descriptors.len())
}

/// Register a built-in agent for every entry of `catalog`, in catalog order.
pub fn register_registry_builtins(
    registry: &mut AgentRegistry,
    catalog: &Catalog,
    store: Arc<dyn RecordStore>,
    defaults: &AgentDefaults,
) -> AgentdeckResult<usize> {
    let source: Arc<dyn DataSource> = Arc::new(SampleDataSource::default());
    let agents = catalog
        .descriptors()
        .iter()
        .map(|d| builtin_agent(d, source.clone(), store.clone(), defaults))
        .collect::<AgentdeckResult<Vec<_>>>()?;
    let count = registry.register_all(agents)?;
    info!(count, "Registered built-in agents");
    Ok(count)
}
