//! Locating snippets inside a loosely shaped context
//!
//! Upstream tools hand the writer and critic whatever mapping they have.
//! The snippet list may sit at the top level, under one of a few known
//! response keys, or under some other key entirely. Resolution is
//! priority ordered and never fails: no match means no snippets.

use serde_json::{Map, Value};

/// Response wrappers checked, in order, after a top-level `snippets` list
pub const NESTED_KEYS: [&str; 3] = ["research_tool_response", "research_response", "tool_response"];

/// Where the snippet list was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnippetSource<'a> {
    /// `context["snippets"]`
    Direct(&'a [Value]),
    /// `context[key]["snippets"]` for a key in [`NESTED_KEYS`]
    NestedUnderKnownKey {
        key: &'static str,
        snippets: &'a [Value],
    },
    /// First value (insertion order) that is a list whose head is a mapping with a `title`
    NestedUnderUnknownKey { key: &'a str, snippets: &'a [Value] },
    Absent,
}

impl<'a> SnippetSource<'a> {
    pub fn resolve(context: Option<&'a Value>) -> Self {
        match context.and_then(Value::as_object) {
            Some(map) if !map.is_empty() => Self::resolve_map(map),
            _ => SnippetSource::Absent,
        }
    }

    fn resolve_map(map: &'a Map<String, Value>) -> Self {
        if let Some(list) = map.get("snippets").and_then(Value::as_array) {
            return SnippetSource::Direct(list);
        }

        for key in NESTED_KEYS {
            let nested = map
                .get(key)
                .and_then(Value::as_object)
                .and_then(|inner| inner.get("snippets"))
                .and_then(Value::as_array);
            if let Some(list) = nested {
                return SnippetSource::NestedUnderKnownKey {
                    key,
                    snippets: list,
                };
            }
        }

        for (key, value) in map {
            if let Some(list) = value.as_array() {
                let titled_head = list
                    .first()
                    .and_then(Value::as_object)
                    .map_or(false, |head| head.contains_key("title"));
                if titled_head {
                    return SnippetSource::NestedUnderUnknownKey {
                        key: key.as_str(),
                        snippets: list,
                    };
                }
            }
        }

        SnippetSource::Absent
    }

    pub fn items(&self) -> &'a [Value] {
        match *self {
            SnippetSource::Direct(snippets)
            | SnippetSource::NestedUnderKnownKey { snippets, .. }
            | SnippetSource::NestedUnderUnknownKey { snippets, .. } => snippets,
            SnippetSource::Absent => &[],
        }
    }

    pub fn views(&self) -> Vec<SnippetView<'a>> {
        self.items().iter().map(SnippetView::from_value).collect()
    }
}

/// Borrowed read of one snippet entry. Fields that are missing or not
/// strings read as `None`; so does everything on a non-mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnippetView<'a> {
    pub title: Option<&'a str>,
    pub text: Option<&'a str>,
}

impl<'a> SnippetView<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        match value.as_object() {
            Some(obj) => Self {
                title: obj.get("title").and_then(Value::as_str),
                text: obj.get("snippet").and_then(Value::as_str),
            },
            None => Self::default(),
        }
    }
}

/// Resolve the snippets a context carries
pub fn extract_snippets(context: Option<&Value>) -> Vec<SnippetView<'_>> {
    SnippetSource::resolve(context).views()
}
