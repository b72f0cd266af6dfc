//! Response ceilings.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Fixed size ceilings applied to every tool result.
///
/// Constructed once at startup and passed by value; a single request may
/// lower the item ceiling for itself but can never raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Items kept in any list
    pub max_items: usize,
    /// Events kept in an events listing
    pub max_events: usize,
    /// Resources reported by a diff
    pub max_diff_resources: usize,
    /// Manifests returned for an application
    pub max_manifests: usize,
    /// Lines kept in any string field
    pub max_response_lines: usize,
    /// Characters kept in any string field
    pub max_response_chars: usize,
}

impl Limits {
    /// Default list ceiling
    pub const MAX_ITEMS: usize = 50;
    /// Default events ceiling
    pub const MAX_EVENTS: usize = 20;
    /// Default diff resources ceiling
    pub const MAX_DIFF_RESOURCES: usize = 20;
    /// Default manifests ceiling
    pub const MAX_MANIFESTS: usize = 20;
    /// Default line ceiling
    pub const MAX_RESPONSE_LINES: usize = 100;
    /// Default character ceiling
    pub const MAX_RESPONSE_CHARS: usize = 50_000;

    /// Reject ceilings that would make every result empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLimit`] naming the first zero ceiling.
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("max_items", self.max_items),
            ("max_events", self.max_events),
            ("max_diff_resources", self.max_diff_resources),
            ("max_manifests", self.max_manifests),
            ("max_response_lines", self.max_response_lines),
            ("max_response_chars", self.max_response_chars),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::InvalidLimit { name: *name }),
            None => Ok(()),
        }
    }

    /// Effective item limit for one request: never above `ceiling`.
    #[must_use]
    pub fn effective(ceiling: usize, requested: Option<usize>) -> usize {
        match requested {
            Some(requested) => requested.min(ceiling),
            None => ceiling,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_items: Self::MAX_ITEMS,
            max_events: Self::MAX_EVENTS,
            max_diff_resources: Self::MAX_DIFF_RESOURCES,
            max_manifests: Self::MAX_MANIFESTS,
            max_response_lines: Self::MAX_RESPONSE_LINES,
            max_response_chars: Self::MAX_RESPONSE_CHARS,
        }
    }
}
