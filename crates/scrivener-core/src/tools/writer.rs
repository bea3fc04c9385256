//! Markdown report writer

use super::context::extract_snippets;
use super::ToolStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_TOPIC: &str = "unknown";
const UNTITLED: &str = "Untitled";
const TLDR_HEADING: &str = "### TL;DR";
const TLDR_BODY: &str = "A short, coherent report about the topic.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPackage {
    pub status: ToolStatus,
    /// Markdown
    pub report: String,
    /// Plain-text summary for frontends that don't render markdown
    pub final_message: String,
}

/// Build the report from whatever context the orchestrator passes along
pub fn write_report(context: Option<&Value>) -> ReportPackage {
    let map = context.and_then(Value::as_object);
    let topic = resolve_topic(map);
    let snippets = extract_snippets(context);

    let mut lines = vec![format!("# Report on {}", topic), String::new()];
    for s in &snippets {
        lines.push(format!(
            "**{}** - {}",
            s.title.unwrap_or(UNTITLED),
            s.text.unwrap_or("")
        ));
        lines.push(String::new());
    }
    lines.push(TLDR_HEADING.to_string());
    lines.push(TLDR_BODY.to_string());
    let report = lines.join("\n");

    let texts: Vec<&str> = snippets.iter().map(|s| s.text.unwrap_or("")).collect();
    let summary = format!("Report on {} — {}", topic, texts.join(" "));
    // The prefix keeps `summary` non-empty, so this branch never fires today.
    let final_message = if summary.is_empty() {
        report.clone()
    } else {
        summary
    };

    ReportPackage {
        status: ToolStatus::Success,
        report,
        final_message,
    }
}

/// A truthy `topic`, else `research_topic` as given, else "unknown"
fn resolve_topic(map: Option<&Map<String, Value>>) -> String {
    let Some(map) = map else {
        return UNKNOWN_TOPIC.to_string();
    };
    if let Some(topic) = map.get("topic").filter(|v| is_truthy(v)) {
        return render(topic);
    }
    map.get("research_topic")
        .map(render)
        .unwrap_or_else(|| UNKNOWN_TOPIC.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => UNKNOWN_TOPIC.to_string(),
        other => other.to_string(),
    }
}
