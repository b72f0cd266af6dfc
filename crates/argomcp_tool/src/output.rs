//! Tool results and their final shaping.

use crate::trait_::ToolResult;
use argomcp_shape::ResponseBounder;
use serde::Serialize;
use serde_json::Value;

/// Unbounded result produced by a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    /// Single value; objects gain a top-level `truncated` flag
    Value(Value),
    /// List wrapped as `{items, total, limited, truncated}`
    List {
        /// All items the platform returned
        items: Vec<Value>,
        /// Ceiling for this kind of list
        ceiling: usize,
        /// Caller-requested limit, never above `ceiling`
        requested: Option<usize>,
    },
}

impl ToolPayload {
    /// Serialize `value` into a value payload
    ///
    /// # Errors
    ///
    /// Returns error if `value` cannot be represented as JSON
    pub fn from_serialize<T: Serialize>(value: &T) -> ToolResult<Self> {
        Ok(Self::Value(serde_json::to_value(value)?))
    }

    /// List payload
    #[must_use]
    pub fn list(items: Vec<Value>, ceiling: usize, requested: Option<usize>) -> Self {
        Self::List {
            items,
            ceiling,
            requested,
        }
    }

    /// Bound the payload and render it as indented JSON.
    ///
    /// An object that already carries a `truncated` flag keeps it set
    /// when it was set by the tool.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn shape(&self, bounder: &ResponseBounder) -> ToolResult<String> {
        let value = match self {
            Self::Value(value) => {
                let bounded = bounder.bound(value);
                match bounded.value {
                    Value::Object(mut map) => {
                        let prior = map
                            .get("truncated")
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        map.insert(
                            "truncated".to_string(),
                            Value::Bool(prior || bounded.truncated),
                        );
                        Value::Object(map)
                    }
                    other => other,
                }
            }
            Self::List {
                items,
                ceiling,
                requested,
            } => serde_json::to_value(bounder.bound_list(items, *ceiling, *requested))?,
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Text returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    /// Indented JSON on success, a message on error
    pub text: String,
    /// Whether this is an error result
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output
    #[must_use]
    pub fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    /// Error output
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            is_error: true,
        }
    }

    /// Parse the text back as JSON
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argomcp_core::Limits;
    use serde_json::json;

    #[test]
    fn test_shape_object_adds_truncated() {
        let text = ToolPayload::Value(json!({"name": "guestbook"}))
            .shape(&ResponseBounder::default())
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"name": "guestbook", "truncated": false}));
        assert!(text.contains("\n  \"name\""));
    }

    #[test]
    fn test_shape_keeps_prior_flag() {
        let text = ToolPayload::Value(json!({"items": [], "truncated": true}))
            .shape(&ResponseBounder::default())
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["truncated"], true);
    }

    #[test]
    fn test_shape_list() {
        let items: Vec<Value> = (0..10).map(|i| json!({"name": format!("app-{i}")})).collect();
        let text = ToolPayload::list(items, 3, None)
            .shape(&ResponseBounder::default())
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 3);
        assert_eq!(value["total"], 10);
        assert_eq!(value["limited"], true);
        assert_eq!(value["truncated"], true);
    }

    #[test]
    fn test_shape_bounds_strings() {
        let bounder = ResponseBounder::new(Limits {
            max_response_chars: 10,
            ..Limits::default()
        });
        let text = ToolPayload::Value(json!({"manifest": "x".repeat(100)}))
            .shape(&bounder)
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["manifest"], "xxxxxxx...");
        assert_eq!(value["truncated"], true);
    }

    #[test]
    fn test_output_constructors() {
        let out = ToolOutput::error("boom");
        assert!(out.is_error);
        assert!(out.json().is_none());
        let ok = ToolOutput::success("{\"a\": 1}".to_string());
        assert_eq!(ok.json(), Some(json!({"a": 1})));
    }
}
