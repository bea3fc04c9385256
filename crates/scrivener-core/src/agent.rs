//! Agent registration and the orchestration loop
//!
//! Deciding which tool to call next is not our job: an [`Orchestrator`]
//! (an LLM runtime, or a script supplied by the host) makes that call.
//! [`run_agent_turn`] drives any orchestrator against the registered tools
//! and reports progress through a callback.

use crate::config::AgentConfig;
use crate::tools::{tool_schemas, ToolName, Toolbox};
use crate::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum tool call iterations before we force a text response
pub const MAX_TOOL_ROUNDS: usize = 10;

const PREVIEW_CHARS: usize = 100;

/// What the orchestrator sees: a named agent with a model, an instruction
/// and the exact tools it may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<ToolName>,
}

impl AgentDefinition {
    /// The research -> writer -> critic agent with all four tools
    pub fn root(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            model: config.model.clone(),
            description: config.description.clone(),
            instruction: config.instruction.clone(),
            tools: ToolName::ALL.to_vec(),
        }
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.as_str() == name)
    }

    pub fn tool_schemas(&self) -> Vec<Value> {
        tool_schemas(&self.tools)
    }
}

/// A tool invocation requested by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(tool: ToolName, arguments: Value) -> Self {
        Self {
            name: tool.as_str().to_string(),
            arguments,
        }
    }
}

/// A call and what it returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExchange {
    pub call: ToolCall,
    pub output: Value,
}

/// The orchestrator's next move
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Call(ToolCall),
    Respond(String),
}

/// Events emitted during agent execution for UI updates
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Waiting on the orchestrator
    Thinking,
    /// A tool is being executed
    ToolCall { name: String, preview: String },
    /// Tool execution completed
    ToolResult { name: String, preview: String },
    /// Final text response from the agent
    Response(String),
    /// Error occurred
    Error(String),
}

/// Decides the next step of a turn
#[async_trait]
pub trait Orchestrator: Send {
    async fn next_step(
        &mut self,
        agent: &AgentDefinition,
        user_message: &str,
        transcript: &[ToolExchange],
    ) -> Result<Step, AgentError>;
}

/// Run the agent loop for a single user message.
///
/// Returns events via the callback as they happen, and the final response as the return value.
pub async fn run_agent_turn<F>(
    agent: &AgentDefinition,
    toolbox: &Toolbox,
    orchestrator: &mut dyn Orchestrator,
    user_message: &str,
    mut on_event: F,
) -> Result<String, AgentError>
where
    F: FnMut(AgentEvent),
{
    let turn_id = Uuid::new_v4();
    tracing::info!(%turn_id, agent = %agent.name, model = %agent.model, "Starting agent turn");

    let mut transcript: Vec<ToolExchange> = Vec::new();

    for round in 0..MAX_TOOL_ROUNDS {
        on_event(AgentEvent::Thinking);

        let step = match orchestrator.next_step(agent, user_message, &transcript).await {
            Ok(step) => step,
            Err(e) => {
                tracing::warn!(%turn_id, round, "Orchestrator failed: {}", e);
                on_event(AgentEvent::Error(e.to_string()));
                return Err(e);
            }
        };

        let call = match step {
            Step::Respond(text) => {
                tracing::info!(%turn_id, rounds = round, "Agent turn complete");
                on_event(AgentEvent::Response(text.clone()));
                return Ok(text);
            }
            Step::Call(call) => call,
        };

        on_event(AgentEvent::ToolCall {
            name: call.name.clone(),
            preview: preview(&call.arguments.to_string()),
        });

        let output = execute_registered(agent, toolbox, &call);
        tracing::debug!(%turn_id, round, tool = %call.name, "Tool returned");

        on_event(AgentEvent::ToolResult {
            name: call.name.clone(),
            preview: preview(&output.to_string()),
        });

        transcript.push(ToolExchange { call, output });
    }

    tracing::warn!(%turn_id, "Hit {} tool rounds without a response", MAX_TOOL_ROUNDS);
    let content = "I've reached the maximum number of tool calls. Here's what I found so far based on the results above.".to_string();
    on_event(AgentEvent::Response(content.clone()));
    Ok(content)
}

/// Tools the agent was not registered with never run; the orchestrator
/// gets an inline error instead.
fn execute_registered(agent: &AgentDefinition, toolbox: &Toolbox, call: &ToolCall) -> Value {
    if !agent.has_tool(&call.name) {
        return error_output(format!("Unknown tool: {}", call.name));
    }
    match toolbox.execute(&call.name, &call.arguments) {
        Ok(output) => output,
        Err(e) => error_output(e.to_string()),
    }
}

fn error_output(message: String) -> Value {
    json!({ "status": "error", "error": message })
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Replays a fixed list of calls, then answers with the last tool output
#[derive(Debug, Clone, Default)]
pub struct ScriptedOrchestrator {
    calls: VecDeque<ToolCall>,
}

impl ScriptedOrchestrator {
    pub fn new(calls: impl IntoIterator<Item = ToolCall>) -> Self {
        Self {
            calls: calls.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Orchestrator for ScriptedOrchestrator {
    async fn next_step(
        &mut self,
        _agent: &AgentDefinition,
        _user_message: &str,
        transcript: &[ToolExchange],
    ) -> Result<Step, AgentError> {
        if let Some(call) = self.calls.pop_front() {
            return Ok(Step::Call(call));
        }
        let text = transcript
            .last()
            .map(|x| x.output.to_string())
            .unwrap_or_else(|| "(no tool output)".to_string());
        Ok(Step::Respond(text))
    }
}

/// research -> writer -> critic, stitching each tool's output into the
/// next call's context. The topic defaults to the user message.
#[derive(Debug, Clone, Default)]
pub struct PipelineOrchestrator {
    topic: Option<String>,
}

impl PipelineOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
        }
    }
}

fn latest_output<'a>(transcript: &'a [ToolExchange], tool: ToolName) -> Option<&'a Value> {
    transcript
        .iter()
        .rev()
        .find(|x| x.call.name == tool.as_str())
        .map(|x| &x.output)
}

#[async_trait]
impl Orchestrator for PipelineOrchestrator {
    async fn next_step(
        &mut self,
        agent: &AgentDefinition,
        user_message: &str,
        transcript: &[ToolExchange],
    ) -> Result<Step, AgentError> {
        for tool in [ToolName::ResearchTool, ToolName::WriterTool, ToolName::CriticTool] {
            if !agent.has_tool(tool.as_str()) {
                return Err(AgentError::Orchestrator(format!(
                    "agent '{}' is not registered with {}",
                    agent.name, tool
                )));
            }
        }

        let topic = self
            .topic
            .clone()
            .unwrap_or_else(|| user_message.trim().to_string());

        let Some(research) = latest_output(transcript, ToolName::ResearchTool) else {
            return Ok(Step::Call(ToolCall::new(
                ToolName::ResearchTool,
                json!({ "topic": topic }),
            )));
        };

        let Some(report) = latest_output(transcript, ToolName::WriterTool) else {
            return Ok(Step::Call(ToolCall::new(
                ToolName::WriterTool,
                json!({ "context": { "topic": topic, "research_tool_response": research } }),
            )));
        };

        let Some(verdict) = latest_output(transcript, ToolName::CriticTool) else {
            return Ok(Step::Call(ToolCall::new(
                ToolName::CriticTool,
                json!({ "report_package": report, "context": research }),
            )));
        };

        let summary = report["final_message"].as_str().unwrap_or_default();
        let ok = verdict["ok"].as_bool().unwrap_or(false);
        let score = verdict["score"].as_f64().unwrap_or(0.0);
        let mut text = format!("{}\n\nCritic: ok={} score={:.2}", summary, ok, score);
        if let Some(missing) = verdict["missing"].as_array().filter(|m| !m.is_empty()) {
            let titles: Vec<&str> = missing.iter().filter_map(Value::as_str).collect();
            text.push_str(&format!(" missing: {}", titles.join(", ")));
        }
        Ok(Step::Respond(text))
    }
}
