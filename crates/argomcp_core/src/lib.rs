//! argocd-mcp Core Types
//!
//! Process-wide configuration and the fixed response ceilings every tool
//! result is bounded by. Nothing here performs network I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod limits;

// Re-exports
pub use config::{ArgoConfig, Config, LogFormat, LoggingConfig, ServerConfig, mask_secret};
pub use error::{ConfigError, ConfigResult};
pub use limits::Limits;
