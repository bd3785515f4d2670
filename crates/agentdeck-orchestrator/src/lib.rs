//! Agent registry and dependency-aware orchestration engine.
//!
//! Two ways to execute agents:
//!
//! - [`AgentRegistry`] — Flat, name-keyed collection with sequential or
//!   concurrent bulk runs and a bounded history per agent. No dependencies.
//! - [`Orchestrator`] — Runs a static [`Catalog`] category by category in a
//!   fixed order, launching each category's agents concurrently and skipping
//!   any agent whose dependencies have not already succeeded in the same run.
//!
//! # Main types
//!
//! - [`UnitDescriptor`] / [`AgentCategory`] — Catalog entries and their grouping.
//! - [`ExecutionTracker`] — Per-invocation record of an orchestration run.
//! - [`OrchestrationResult`] — Summary, per-category results and full history of a run.
//! - [`OrchestratorStatistics`] — Aggregates over the retained history.

/// Static catalog types: categories, descriptors and the dependency graph.
pub mod catalog;
/// Orchestrator and registry tunables.
pub mod config;
/// The built-in dashboard catalog.
pub mod defaults;
/// The dependency-aware orchestration engine.
pub mod engine;
/// Name-keyed agent registry with direct execution.
pub mod registry;
/// Trackers, results, filters and statistics.
pub mod types;

pub use catalog::{AgentCategory, Catalog, DanglingDependency, UnitDescriptor};
pub use config::{OrchestratorConfig, RegistryConfig};
pub use defaults::{default_catalog, default_descriptors};
pub use engine::Orchestrator;
pub use registry::{AgentRegistry, RegistryStatus};
pub use types::{
    CategoryExecutionResult, CategoryStatistics, ExecutionTracker, HistoryFilter,
    OrchestrationResult, OrchestrationSummary, OrchestratorStatistics, OrchestratorStatus,
    TrackerStatus,
};
