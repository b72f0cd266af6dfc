//! Errors raised by response shaping.
//!
//! Both are recoverable: a [`ParseError`] means the caller shows the raw
//! text instead, a [`MalformedEventsError`] becomes a tool-level error.

use thiserror::Error;

/// Document text is not well-formed JSON
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid JSON at line {line}, column {column}: {reason}")]
pub struct ParseError {
    /// Parser message
    pub reason: String,
    /// 1-based line of the failure
    pub line: usize,
    /// 1-based column of the failure
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            reason: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Event payload is neither a wrapped nor a bare list of records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized events payload: {found}")]
pub struct MalformedEventsError {
    /// Description of what was received instead
    pub found: String,
}
