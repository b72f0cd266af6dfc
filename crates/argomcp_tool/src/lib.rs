//! argocd-mcp Tool System
//!
//! Tool interface with JSON Schema descriptions, argument helpers, and a
//! registry that gates write operations behind safe mode and bounds every
//! result before it leaves the process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod output;
pub mod registry;
pub mod schema;
pub mod trait_;

pub use args::{Arguments, parse_pairs};
pub use output::{ToolOutput, ToolPayload};
pub use registry::ToolRegistry;
pub use schema::{SideEffect, ToolSchema};
pub use trait_::{CallContext, Tool, ToolError, ToolResult};
