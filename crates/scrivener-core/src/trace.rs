//! Diagnostic trace channel
//!
//! Every tool reports what it was called with as a single line:
//! `[TRACE] <tag> | <json payload>`. The sink is injected into the
//! toolbox so hosts and tests decide where those lines go.

use crate::config::TraceConfig;
use serde_json::Value;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;

/// Default payload truncation, in characters
pub const DEFAULT_MAX_PAYLOAD_CHARS: usize = 1000;

/// Where trace lines end up
pub trait TraceSink: Send + Sync {
    fn emit(&self, tag: &str, payload: &Value);
}

/// Render a trace line, truncating the JSON payload to `max_chars` characters
///
/// The payload is compact JSON with non-ASCII left unescaped, so the limit
/// counts fewer characters per value than `{"k": "v"}` style with `\uXXXX`
/// escapes would.
pub fn format_line(tag: &str, payload: &Value, max_chars: usize) -> String {
    let json = serde_json::to_string(payload).unwrap_or_default();
    let truncated: String = json.chars().take(max_chars).collect();
    format!("[TRACE] {} | {}", tag, truncated)
}

/// Forwards trace lines to `tracing` at INFO
pub struct TracingSink {
    filter: LevelFilter,
    max_chars: usize,
}

impl TracingSink {
    pub fn new(filter: LevelFilter, max_chars: usize) -> Self {
        Self { filter, max_chars }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(config.level_filter(), config.max_payload_chars)
    }

    fn enabled(&self) -> bool {
        self.filter >= LevelFilter::INFO
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(LevelFilter::INFO, DEFAULT_MAX_PAYLOAD_CHARS)
    }
}

impl TraceSink for TracingSink {
    fn emit(&self, tag: &str, payload: &Value) {
        if self.enabled() {
            tracing::info!("{}", format_line(tag, payload, self.max_chars));
        }
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _tag: &str, _payload: &Value) {}
}

/// Keeps formatted lines in memory
pub struct RecordingSink {
    max_chars: usize,
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_max_chars(DEFAULT_MAX_PAYLOAD_CHARS)
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every line recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for RecordingSink {
    fn emit(&self, tag: &str, payload: &Value) {
        let line = format_line(tag, payload, self.max_chars);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}
