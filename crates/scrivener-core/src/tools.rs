//! Tool definitions and execution
//!
//! The four tools live in submodules as plain functions. [`Toolbox`] binds
//! them to a trace sink and a clock, and dispatches JSON arguments by tool
//! name for whatever orchestrator is driving the agent.

pub mod context;
pub mod critic;
pub mod research;
pub mod time;
pub mod writer;

use crate::trace::TraceSink;
use crate::ToolError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use context::{extract_snippets, SnippetSource, SnippetView};
pub use critic::Verdict;
pub use research::ResearchResult;
pub use time::TimeResult;
pub use writer::ReportPackage;

/// Result status carried by tool outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// One unit of research output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub snippet: String,
}

impl Snippet {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Every tool the agent can be registered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetCurrentTime,
    ResearchTool,
    WriterTool,
    CriticTool,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::GetCurrentTime,
        ToolName::ResearchTool,
        ToolName::WriterTool,
        ToolName::CriticTool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetCurrentTime => "get_current_time",
            ToolName::ResearchTool => "research_tool",
            ToolName::WriterTool => "writer_tool",
            ToolName::CriticTool => "critic_tool",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// OpenAI-compatible function schemas for the given tools
pub fn tool_schemas(tools: &[ToolName]) -> Vec<Value> {
    tools.iter().map(|t| tool_schema(*t)).collect()
}

fn tool_schema(tool: ToolName) -> Value {
    let (description, parameters) = match tool {
        ToolName::GetCurrentTime => (
            "Return the current time for a timezone string like 'Asia/Kolkata'.",
            json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string", "description": "IANA timezone name, e.g. 'Europe/Paris'" }
                },
                "required": ["city"]
            }),
        ),
        ToolName::ResearchTool => (
            "Mock research tool: returns canned snippet objects for a topic.",
            json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string", "description": "The topic to research" }
                },
                "required": ["topic"]
            }),
        ),
        ToolName::WriterTool => (
            "Build a small markdown report from context. Returns status, report and a plain-text final_message.",
            json!({
                "type": "object",
                "properties": {
                    "context": {
                        "type": "object",
                        "description": "Topic plus research output, e.g. {topic, snippets} or {topic, research_tool_response}"
                    }
                },
                "required": ["context"]
            }),
        ),
        ToolName::CriticTool => (
            "Check that every snippet title is covered by the report text and return a verdict.",
            json!({
                "type": "object",
                "properties": {
                    "report_package": { "type": "object", "description": "Output of writer_tool" },
                    "context": { "type": "object", "description": "The context the report was written from" }
                },
                "required": ["report_package", "context"]
            }),
        ),
    };

    json!({
        "type": "function",
        "function": {
            "name": tool.as_str(),
            "description": description,
            "parameters": parameters
        }
    })
}

type Clock = dyn Fn() -> DateTime<Utc> + Send + Sync;

/// The tools, bound to a trace sink and a clock
#[derive(Clone)]
pub struct Toolbox {
    trace: Arc<dyn TraceSink>,
    clock: Arc<Clock>,
}

impl Toolbox {
    pub fn new(trace: Arc<dyn TraceSink>) -> Self {
        Self {
            trace,
            clock: Arc::new(Utc::now),
        }
    }

    /// Fixed or simulated time source, mostly for tests
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn get_current_time(&self, city: &str) -> TimeResult {
        self.trace.emit("get_current_time.called", &json!({ "city": city }));
        time::current_time_at(city, (self.clock)())
    }

    pub fn research_tool(&self, topic: &str) -> ResearchResult {
        self.trace.emit("research_tool.called", &json!({ "topic": topic }));
        research::research(topic)
    }

    pub fn writer_tool(&self, context: Option<&Value>) -> ReportPackage {
        let keys: Vec<&str> = context
            .and_then(Value::as_object)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        self.trace.emit("writer_tool.start", &json!({ "keys": keys }));
        writer::write_report(context)
    }

    pub fn critic_tool(&self, report_package: Option<&Value>, context: Option<&Value>) -> Verdict {
        self.trace.emit("critic_tool.start", &json!({}));
        let verdict = critic::critique(report_package, context);
        self.trace.emit("critic_tool.finish", &to_json(&verdict));
        verdict
    }

    /// Run a tool from a JSON argument object
    ///
    /// Missing strings read as empty, missing or null mappings as absent.
    pub fn execute(&self, name: &str, args: &Value) -> Result<Value, ToolError> {
        let tool: ToolName = name.parse()?;
        tracing::debug!(tool = %tool, "Executing tool");

        let output = match tool {
            ToolName::GetCurrentTime => to_json(&self.get_current_time(str_arg(args, "city"))),
            ToolName::ResearchTool => to_json(&self.research_tool(str_arg(args, "topic"))),
            ToolName::WriterTool => to_json(&self.writer_tool(map_arg(args, "context"))),
            ToolName::CriticTool => to_json(
                &self.critic_tool(map_arg(args, "report_package"), map_arg(args, "context")),
            ),
        };
        Ok(output)
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or("")
}

fn map_arg<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RecordingSink;
    use chrono::TimeZone;

    fn toolbox() -> (Toolbox, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let tools = Toolbox::new(sink.clone())
            .with_clock(|| Utc.with_ymd_and_hms(2024, 6, 1, 0, 15, 0).unwrap());
        (tools, sink)
    }

    #[test]
    fn test_tool_name_roundtrip() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
        assert!(matches!(
            "shell".parse::<ToolName>(),
            Err(ToolError::UnknownTool(name)) if name == "shell"
        ));
    }

    #[test]
    fn test_schemas_cover_every_tool() {
        let schemas = tool_schemas(&ToolName::ALL);
        let names: Vec<&str> = schemas
            .iter()
            .filter_map(|s| s["function"]["name"].as_str())
            .collect();
        assert_eq!(names, vec!["get_current_time", "research_tool", "writer_tool", "critic_tool"]);
        assert_eq!(schemas[3]["function"]["parameters"]["required"], json!(["report_package", "context"]));
    }

    #[test]
    fn test_execute_time_uses_clock() {
        let (tools, sink) = toolbox();
        let out = tools.execute("get_current_time", &json!({"city": "Asia/Tokyo"})).unwrap();
        assert_eq!(out, json!({"status": "success", "city": "Asia/Tokyo", "time": "09:15 AM JST"}));
        assert_eq!(sink.lines(), vec![r#"[TRACE] get_current_time.called | {"city":"Asia/Tokyo"}"#]);
    }

    #[test]
    fn test_execute_missing_city_is_error_result() {
        let (tools, _) = toolbox();
        let out = tools.execute("get_current_time", &json!({})).unwrap();
        assert_eq!(out["status"], "error");
    }

    #[test]
    fn test_execute_unknown_tool() {
        let (tools, _) = toolbox();
        let err = tools.execute("read_file", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: read_file");
    }

    #[test]
    fn test_writer_and_critic_traces() {
        let (tools, sink) = toolbox();
        let ctx = json!({"topic": "Owls", "snippets": [{"title": "Owls - A", "snippet": "hoot"}]});
        let report = tools.execute("writer_tool", &json!({ "context": ctx })).unwrap();
        let verdict = tools
            .execute("critic_tool", &json!({ "report_package": report, "context": ctx }))
            .unwrap();
        assert_eq!(verdict, json!({"ok": true, "missing": [], "score": 1.0}));
        assert_eq!(
            sink.lines(),
            vec![
                r#"[TRACE] writer_tool.start | {"keys":["topic","snippets"]}"#.to_string(),
                "[TRACE] critic_tool.start | {}".to_string(),
                r#"[TRACE] critic_tool.finish | {"ok":true,"missing":[],"score":1.0}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_writer_null_context() {
        let (tools, sink) = toolbox();
        let out = tools.execute("writer_tool", &json!({"context": null})).unwrap();
        assert!(out["report"].as_str().unwrap().starts_with("# Report on unknown"));
        assert_eq!(sink.lines(), vec![r#"[TRACE] writer_tool.start | {"keys":[]}"#]);
    }
}
