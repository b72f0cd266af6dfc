//! Tool trait

use crate::args::Arguments;
use crate::output::ToolPayload;
use crate::schema::ToolSchema;
use argomcp_core::Limits;
use argomcp_shape::{MalformedEventsError, ResponseBounder};
use async_trait::async_trait;
use thiserror::Error;

/// Error from a tool call.
///
/// None of these end the process; the registry turns each into an error
/// result for the caller.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Missing or ill-typed argument
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// What was wrong
        reason: String,
    },
    /// Refused because safe mode is on
    #[error(
        "Operation '{operation}' is not allowed in safe mode. Safe mode restricts write operations for security."
    )]
    SafeMode {
        /// Refused operation
        operation: String,
    },
    /// The platform rejected or failed the request
    #[error("{0}")]
    Platform(String),
    /// The platform returned an unrecognized events payload
    #[error("Failed to parse events: {0}")]
    MalformedEvents(#[from] MalformedEventsError),
    /// No tool by that name
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// Requested name
        name: String,
    },
    /// Result could not be serialized
    #[error("Failed to format response: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result alias for tool calls
pub type ToolResult<T> = Result<T, ToolError>;

/// Per-call context shared by all tools
#[derive(Debug, Clone, Copy, Default)]
pub struct CallContext {
    /// Whether write operations are refused
    pub safe_mode: bool,
    /// Ceilings for results
    pub bounder: ResponseBounder,
}

impl CallContext {
    /// Create a context
    #[must_use]
    pub fn new(safe_mode: bool, limits: Limits) -> Self {
        Self {
            safe_mode,
            bounder: ResponseBounder::new(limits),
        }
    }

    /// Ceilings in effect
    #[must_use]
    pub fn limits(&self) -> &Limits {
        self.bounder.limits()
    }

    /// Refuse `operation` when safe mode is on
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::SafeMode`] in safe mode
    pub fn ensure_writable(&self, operation: &str) -> ToolResult<()> {
        if self.safe_mode {
            return Err(ToolError::SafeMode {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema advertised to callers
    fn schema(&self) -> &ToolSchema;

    /// Tool name
    fn name(&self) -> &str {
        &self.schema().name
    }

    /// Run the tool. The result is bounded by the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] on bad arguments or platform failure
    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload>;
}
