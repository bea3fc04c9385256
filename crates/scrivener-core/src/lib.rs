//! Scrivener Core - research, writing and critique tools
//!
//! Four stateless tools (clock lookup, mock research, report writer,
//! report critic) plus the seam an external orchestrator plugs into.
//! Frontends (the CLI, or a host embedding an LLM runtime) share the
//! same tool implementations.

pub mod agent;
pub mod config;
pub mod tools;
pub mod trace;

pub use agent::{
    run_agent_turn, AgentDefinition, AgentEvent, Orchestrator, PipelineOrchestrator,
    ScriptedOrchestrator, Step, ToolCall, ToolExchange,
};
pub use config::{AgentConfig, ScrivenerConfig, TraceConfig};
pub use tools::{tool_schemas, ToolName, Toolbox};
pub use trace::{NoopSink, RecordingSink, TraceSink, TracingSink};

/// Tool errors
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Agent loop errors
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Orchestrator error: {0}")]
    Orchestrator(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
