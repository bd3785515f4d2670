use agentdeck_builtins::AgentDefaults;
use agentdeck_core::{AgentdeckError, AgentdeckResult};
use agentdeck_orchestrator::{OrchestratorConfig, RegistryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `agentdeck.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentdeckConfig {
    #[serde(default)]
    pub agent: AgentDefaults,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Read and parse a TOML config file. A missing file yields the defaults.
pub async fn load_config(path: &Path) -> AgentdeckResult<AgentdeckConfig> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(AgentdeckConfig::default());
        }
        Err(e) => {
            return Err(AgentdeckError::Config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            )))
        }
    };
    parse_config(&content).map_err(|e| {
        AgentdeckError::Config(format!("{} ('{}')", config_message(e), path.display()))
    })
}

/// Parse and validate a TOML document.
pub fn parse_config(content: &str) -> AgentdeckResult<AgentdeckConfig> {
    let config: AgentdeckConfig = toml::from_str(content)
        .map_err(|e| AgentdeckError::Config(format!("Failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}

fn config_message(err: AgentdeckError) -> String {
    match err {
        AgentdeckError::Config(message) => message,
        other => other.to_string(),
    }
}

impl AgentdeckConfig {
    fn validate(&self) -> AgentdeckResult<()> {
        if self.agent.timeout_ms == 0 {
            return Err(AgentdeckError::Config(
                "agent.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_all_sections() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp.as_file_mut(),
            r#"
[agent]
max_retries = 1
timeout_ms = 500

[agent.retry]
backoff_base_ms = 50

[registry]
history_capacity = 10

[orchestrator]
category_pause_ms = 0
"#
        )
        .unwrap();

        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config.agent.max_retries, 1);
        assert_eq!(config.agent.timeout_ms, 500);
        assert_eq!(config.agent.retry.backoff_base_ms, 50);
        assert_eq!(config.agent.retry.backoff_max_ms, 5_000);
        assert_eq!(config.registry.history_capacity, 10);
        assert_eq!(config.orchestrator.category_pause_ms, 0);
        // Not specified in the file.
        assert_eq!(config.orchestrator.max_history, 1_000);
    }

    #[tokio::test]
    async fn test_empty_file_is_all_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp.as_file_mut()).unwrap();
        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config, AgentdeckConfig::default());
    }

    #[tokio::test]
    async fn test_missing_file_is_all_defaults() {
        let config = load_config(Path::new("/nonexistent/path/agentdeck.toml"))
            .await
            .unwrap();
        assert_eq!(config, AgentdeckConfig::default());
        assert_eq!(config.orchestrator.category_pause_ms, 100);
        assert_eq!(config.registry.history_capacity, 50);
    }

    #[tokio::test]
    async fn test_invalid_toml_returns_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp.as_file_mut(), "{{{{invalid toml!!!!").unwrap();
        let err_msg = load_config(tmp.path()).await.unwrap_err().to_string();
        assert!(
            err_msg.contains("Failed to parse config"),
            "unexpected error: {err_msg}"
        );
    }

    #[tokio::test]
    async fn test_load_validates_and_names_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp.as_file_mut(), "[agent]\ntimeout_ms = 0").unwrap();
        let err_msg = load_config(tmp.path()).await.unwrap_err().to_string();
        assert!(err_msg.contains("timeout_ms"), "unexpected error: {err_msg}");
        assert!(
            err_msg.contains(&tmp.path().display().to_string()),
            "unexpected error: {err_msg}"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config("[agent]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, AgentdeckError::Config(_)));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&AgentdeckConfig::default()).unwrap();
        assert_eq!(parse_config(&rendered).unwrap(), AgentdeckConfig::default());
    }
}
