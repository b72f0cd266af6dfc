//! argocd-mcp Argo CD Integration
//!
//! The client boundary to the Argo CD API, an offline client backed by a
//! JSON snapshot of platform state, and the MCP tools built on top of
//! them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod format;
pub mod snapshot;
pub mod tools;

pub use client::{
    Application, ApplicationQuery, ArgoClient, ClientError, ClientResult, ResourceDiff,
    SyncRequest,
};
pub use format::{ApplicationDetail, ApplicationSummary};
pub use snapshot::{Snapshot, SnapshotClient};
pub use tools::{build_registry, register_all};
