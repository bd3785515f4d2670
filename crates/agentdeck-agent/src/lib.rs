//! The agent contract: a named task with a fixed `collect` → `process` →
//! `publish` body, wrapped uniformly with timeout, retry and metrics.
//!
//! # Main types
//!
//! - [`Agent`] — Trait implemented by every concrete agent.
//! - [`ManagedAgent`] — Execution wrapper that owns config, metrics and the last result.
//! - [`UnitConfig`] — Identity and execution policy of an agent.
//! - [`UnitMetrics`] — Live counters, updated once per run.
//! - [`RunResult`] — Immutable record of one run.
//! - [`RetryPolicy`] — Delay between retry attempts.

pub mod agent;
pub mod config;
pub mod metrics;
pub mod result;
pub mod retry;
pub mod runner;

pub use agent::Agent;
pub use config::UnitConfig;
pub use metrics::{AgentStatus, UnitMetrics};
pub use result::{RunResult, RunStatus};
pub use retry::RetryPolicy;
pub use runner::ManagedAgent;
