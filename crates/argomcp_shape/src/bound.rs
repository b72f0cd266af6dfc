//! Size ceilings for tool results.
//!
//! Every value returned to a caller passes through [`ResponseBounder`].
//! Strings are cut by characters then by lines, sequences keep a prefix,
//! and objects keep all keys while their values are bounded in turn.

use argomcp_core::Limits;
use serde::Serialize;
use serde_json::Value;

/// Ellipsis replacing the tail of a long string
const ELLIPSIS: &str = "...";

/// Final line of a string cut by the line ceiling
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Bounded value and whether anything was cut
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounded<T> {
    /// Value within every ceiling
    pub value: T,
    /// Whether any ceiling was applied
    pub truncated: bool,
}

/// Bounded list result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundedList {
    /// Kept items, each bounded
    pub items: Vec<Value>,
    /// Item count before truncation
    pub total: usize,
    /// Whether items were dropped (`total > items.len()`)
    pub limited: bool,
    /// Whether anything was cut, in the list or inside its items
    pub truncated: bool,
}

/// Applies [`Limits`] to result values
#[derive(Debug, Clone, Copy)]
pub struct ResponseBounder {
    limits: Limits,
}

impl Default for ResponseBounder {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl ResponseBounder {
    /// Create a bounder. Zero ceilings are raised to one.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            limits: Limits {
                max_items: limits.max_items.max(1),
                max_events: limits.max_events.max(1),
                max_diff_resources: limits.max_diff_resources.max(1),
                max_manifests: limits.max_manifests.max(1),
                max_response_lines: limits.max_response_lines.max(1),
                max_response_chars: limits.max_response_chars.max(1),
            },
        }
    }

    /// Ceilings in effect
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Bound a value
    #[must_use]
    pub fn bound(&self, value: &Value) -> Bounded<Value> {
        let mut truncated = false;
        let value = self.bound_value(value, &mut truncated);
        Bounded { value, truncated }
    }

    /// Bound a string
    #[must_use]
    pub fn bound_str(&self, text: &str) -> Bounded<String> {
        let mut truncated = false;
        let value = self.bound_text(text, &mut truncated);
        Bounded { value, truncated }
    }

    /// Cut `text` to `max_chars` characters only.
    ///
    /// Used for fields with their own, smaller budget such as each half of
    /// a diff.
    #[must_use]
    pub fn truncate_chars(text: &str, max_chars: usize) -> Bounded<String> {
        match truncate_chars(text, max_chars) {
            Some(value) => Bounded {
                value,
                truncated: true,
            },
            None => Bounded {
                value: text.to_string(),
                truncated: false,
            },
        }
    }

    /// Keep at most `min(ceiling, requested)` items and bound each.
    #[must_use]
    pub fn bound_list(
        &self,
        items: &[Value],
        ceiling: usize,
        requested: Option<usize>,
    ) -> BoundedList {
        let limit = Limits::effective(ceiling, requested);
        let total = items.len();
        let mut truncated = false;
        let kept: Vec<Value> = items
            .iter()
            .take(limit)
            .map(|item| self.bound_value(item, &mut truncated))
            .collect();
        let limited = total > kept.len();
        BoundedList {
            items: kept,
            total,
            limited,
            truncated: truncated || limited,
        }
    }

    fn bound_value(&self, value: &Value, truncated: &mut bool) -> Value {
        match value {
            Value::String(s) => Value::String(self.bound_text(s, truncated)),
            Value::Array(items) => {
                if items.len() > self.limits.max_items {
                    *truncated = true;
                }
                Value::Array(
                    items
                        .iter()
                        .take(self.limits.max_items)
                        .map(|item| self.bound_value(item, truncated))
                        .collect(),
                )
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, val)| (key.clone(), self.bound_value(val, truncated)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }

    fn bound_text(&self, text: &str, truncated: &mut bool) -> String {
        let max_chars = self.limits.max_response_chars;
        let mut out = match truncate_chars(text, max_chars) {
            Some(cut) => {
                *truncated = true;
                cut
            }
            None => text.to_string(),
        };
        if let Some(cut) = truncate_lines(&out, self.limits.max_response_lines) {
            *truncated = true;
            // the marker may push a short result back over the character ceiling
            out = truncate_chars(&cut, max_chars).unwrap_or(cut);
        }
        out
    }
}

/// Character-aware cut, `None` when `text` already fits
fn truncate_chars(text: &str, max_chars: usize) -> Option<String> {
    if text.chars().count() <= max_chars {
        return None;
    }
    if max_chars <= ELLIPSIS.len() {
        return Some(".".repeat(max_chars));
    }
    let mut out: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    Some(out)
}

/// Keep `max_lines - 1` lines plus the marker, `None` when `text` fits
fn truncate_lines(text: &str, max_lines: usize) -> Option<String> {
    if text.split('\n').count() <= max_lines {
        return None;
    }
    let mut out = text
        .split('\n')
        .take(max_lines.saturating_sub(1))
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() || max_lines > 1 {
        out.push('\n');
    }
    out.push_str(TRUNCATION_MARKER);
    Some(out)
}
