//! Configuration for the agent registration and the trace channel

use crate::trace::DEFAULT_MAX_PAYLOAD_CHARS;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

pub const ENV_MODEL: &str = "SCRIVENER_MODEL";
pub const ENV_TRACE_MAX_CHARS: &str = "SCRIVENER_TRACE_MAX_CHARS";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrivenerConfig {
    pub agent: AgentConfig,
    pub trace: TraceConfig,
}

/// How the agent is registered with the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "root_agent".to_string(),
            model: "gemini-2.5-flash".to_string(),
            description: "Mini pipeline: research -> writer -> critic".to_string(),
            instruction: "You orchestrate research, writing and critique using tools: \
                'research_tool(topic)', 'writer_tool(context)', 'critic_tool(report, context)'."
                .to_string(),
        }
    }
}

/// Trace channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Minimum severity, e.g. "info" or "off"
    pub level: String,
    pub max_payload_chars: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_payload_chars: DEFAULT_MAX_PAYLOAD_CHARS,
        }
    }
}

impl TraceConfig {
    /// Unparseable levels fall back to INFO
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::INFO)
    }
}

impl ScrivenerConfig {
    /// Load from an optional JSON file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.agent.model = model;
        }
        if let Some(raw) = lookup(ENV_TRACE_MAX_CHARS) {
            match raw.trim().parse::<usize>() {
                Ok(n) => self.trace.max_payload_chars = n,
                Err(_) => tracing::warn!("Ignoring {}={:?}: not a number", ENV_TRACE_MAX_CHARS, raw),
            }
        }
    }
}
