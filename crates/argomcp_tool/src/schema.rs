//! Tool schemas advertised to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Whether a tool changes platform state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideEffect {
    /// Reads only
    #[default]
    Read,
    /// Creates, changes, or deletes platform objects; refused in safe mode
    Write,
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.pad("read"),
            Self::Write => f.pad("write"),
        }
    }
}

/// Schema for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// One-line description shown to callers
    pub description: String,
    /// JSON Schema of the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Declared side effect
    #[serde(skip)]
    pub side_effect: SideEffect,
}

impl ToolSchema {
    /// Create a read-only schema taking no arguments
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: json!({"type": "object", "properties": {}}),
            side_effect: SideEffect::Read,
        }
    }

    /// Set the arguments schema
    #[must_use]
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set the side effect
    #[must_use]
    pub fn with_side_effect(mut self, effect: SideEffect) -> Self {
        self.side_effect = effect;
        self
    }

    /// Whether the tool is refused in safe mode
    #[must_use]
    pub fn is_write(&self) -> bool {
        self.side_effect == SideEffect::Write
    }

    /// Names listed under `required` in the arguments schema
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
