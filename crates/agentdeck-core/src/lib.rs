//! Core types and error definitions for the agentdeck orchestration core.
//!
//! This crate provides the foundational types shared across all agentdeck
//! crates: the unified error taxonomy and the identifiers of the three
//! execution phases every agent goes through.
//!
//! # Main types
//!
//! - [`AgentdeckError`] — Unified error enum for registration, lookup and execution failures.
//! - [`AgentdeckResult`] — Convenience alias for `Result<T, AgentdeckError>`.
//! - [`Phase`] — One of the `collect`, `process` or `publish` steps of an agent run.

use serde::{Deserialize, Serialize};

// --- Error types ---

/// Top-level error type for agentdeck.
///
/// Registration and lookup variants (`Config`, `DuplicateName`, `NotFound`,
/// `Catalog`) are returned to callers. Execution variants are recorded on
/// run results and trackers as their display string.
#[derive(Debug, thiserror::Error)]
pub enum AgentdeckError {
    /// Malformed agent configuration (e.g. an empty name or a zero timeout).
    #[error("Config error: {0}")]
    Config(String),

    /// An agent with this name is already registered.
    #[error("Duplicate agent name: {0}")]
    DuplicateName(String),

    /// No agent with this name is registered.
    #[error("Agent not found: {0}")]
    NotFound(String),

    /// Unknown catalog id or malformed catalog.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// One or more declared dependencies have no successful run in the
    /// current orchestration run.
    #[error("Dependencies not satisfied")]
    DependencyUnsatisfied {
        /// Dependency ids that were missing a successful tracker.
        missing: Vec<String>,
    },

    /// One of the agent phases returned an error.
    #[error("{phase} phase failed: {message}")]
    Phase {
        /// The phase that failed.
        phase: Phase,
        /// Error message reported by the phase.
        message: String,
    },

    /// An attempt exceeded the agent's timeout.
    #[error("Timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout budget that was exceeded.
        timeout_ms: u64,
    },

    /// The agent or its catalog entry is disabled.
    #[error("Agent '{0}' is disabled")]
    Disabled(String),

    /// The task running an agent panicked or was cancelled.
    #[error("Execution error: {0}")]
    Execution(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentdeckError {
    /// Builds a [`AgentdeckError::Phase`] from any displayable error.
    pub fn phase(phase: Phase, message: impl std::fmt::Display) -> Self {
        Self::Phase {
            phase,
            message: message.to_string(),
        }
    }
}

/// A convenience `Result` alias using [`AgentdeckError`].
pub type AgentdeckResult<T> = Result<T, AgentdeckError>;

// --- Phases ---

/// The three steps of an agent body, always run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Gather raw input data.
    Collect,
    /// Turn raw data into the agent's output.
    Process,
    /// Write the output to its destination.
    Publish,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Collect => write!(f, "collect"),
            Phase::Process => write!(f, "process"),
            Phase::Publish => write!(f, "publish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_error_display_is_fixed() {
        let err = AgentdeckError::DependencyUnsatisfied {
            missing: vec!["billing".into()],
        };
        assert_eq!(err.to_string(), "Dependencies not satisfied");
    }

    #[test]
    fn test_phase_error_display() {
        let err = AgentdeckError::phase(Phase::Process, "division by zero");
        assert_eq!(err.to_string(), "process phase failed: division by zero");
    }
}
