//! Argo CD client boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Sync status of an out-of-sync resource or application
pub const OUT_OF_SYNC: &str = "OutOfSync";
/// Sync status of a synced resource or application
pub const SYNCED: &str = "Synced";
/// Health status of a healthy application
pub const HEALTHY: &str = "Healthy";

/// Error from the platform
#[derive(Debug, Error)]
pub enum ClientError {
    /// Object does not exist
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Object kind, e.g. `application`
        kind: &'static str,
        /// Requested name
        name: String,
    },
    /// The platform refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),
    /// Snapshot file could not be read
    #[error("Failed to read snapshot {path}: {source}")]
    Snapshot {
        /// Snapshot path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Snapshot content is not valid platform state
    #[error("Invalid snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Where an application deploys to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    /// Cluster API server URL
    pub server: String,
    /// Target namespace
    pub namespace: String,
}

/// Where an application's manifests come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Source {
    /// Git or Helm repository URL
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    /// Path inside the repository
    pub path: String,
    /// Branch, tag, or commit
    pub target_revision: String,
}

/// Sync state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncInfo {
    /// `Synced`, `OutOfSync`, or `Unknown`
    pub status: String,
    /// Revision last synced
    pub revision: String,
}

/// Health state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthInfo {
    /// `Healthy`, `Progressing`, `Degraded`, ...
    pub status: String,
    /// Detail message
    pub message: String,
}

/// Last operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationState {
    /// `Running`, `Succeeded`, `Failed`, `Error`, ...
    pub phase: String,
    /// Detail message
    pub message: String,
}

impl OperationState {
    /// Whether the operation ended badly
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.phase.as_str(), "Failed" | "Error")
    }
}

/// Application condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    /// Condition type, e.g. `SyncError`
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Detail message
    pub message: String,
}

/// Per-resource status of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceStatus {
    /// API group
    pub group: String,
    /// Kind
    pub kind: String,
    /// Namespace
    pub namespace: String,
    /// Name
    pub name: String,
    /// Sync status
    pub status: String,
}

/// Argo CD application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    /// Application name
    pub name: String,
    /// Owning project
    pub project: String,
    /// Deployment target
    pub destination: Destination,
    /// Manifest source
    pub source: Source,
    /// Sync state
    pub sync: SyncInfo,
    /// Health state
    pub health: HealthInfo,
    /// Last operation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationState>,
    /// Conditions
    pub conditions: Vec<Condition>,
    /// Managed resources
    pub resources: Vec<ResourceStatus>,
}

impl Application {
    /// Resources whose sync status is `OutOfSync`
    #[must_use]
    pub fn out_of_sync_count(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| r.status == OUT_OF_SYNC)
            .count()
    }

    /// Out-of-sync resources, unhealthy, or a failed operation
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.out_of_sync_count() > 0
            || self.health.status != HEALTHY
            || self.operation.as_ref().is_some_and(OperationState::is_failed)
    }
}

/// Managed resource with its target and live states
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceDiff {
    /// API group
    pub group: String,
    /// Kind
    pub kind: String,
    /// Namespace
    pub namespace: String,
    /// Name
    pub name: String,
    /// Desired state as JSON text
    pub target_state: String,
    /// Live state as JSON text, normalized by the platform
    pub normalized_live_state: String,
    /// Whether target and live differ
    pub modified: bool,
    /// Legacy diff text; non-empty means out of sync
    pub diff: String,
    /// Live resource version
    pub resource_version: String,
}

impl ResourceDiff {
    /// Whether the resource is out of sync
    #[must_use]
    pub fn is_out_of_sync(&self) -> bool {
        self.modified || !self.diff.is_empty()
    }
}

/// Filter for listing applications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    /// Exact name
    pub name: Option<String>,
    /// Owning project
    pub project: Option<String>,
}

impl ApplicationQuery {
    /// Whether `app` passes the filter
    #[must_use]
    pub fn matches(&self, app: &Application) -> bool {
        self.name.as_deref().is_none_or(|name| app.name == name)
            && self
                .project
                .as_deref()
                .is_none_or(|project| app.project == project)
    }
}

/// Sync request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRequest {
    /// Application name
    pub name: String,
    /// Revision to sync to; the tracked revision when absent
    pub revision: Option<String>,
    /// Delete resources no longer in the target state
    pub prune: bool,
}

/// Access to Argo CD.
///
/// Projects, repositories, clusters and event payloads are returned as
/// the platform's JSON; applications are typed.
#[async_trait]
pub trait ArgoClient: Send + Sync {
    /// List applications
    async fn list_applications(&self, query: &ApplicationQuery) -> ClientResult<Vec<Application>>;

    /// Get one application
    async fn get_application(&self, name: &str) -> ClientResult<Application>;

    /// Start a sync and return the updated application
    async fn sync_application(&self, request: &SyncRequest) -> ClientResult<Application>;

    /// Delete an application, and its resources when `cascade` is set
    async fn delete_application(&self, name: &str, cascade: bool) -> ClientResult<()>;

    /// Rendered manifests as JSON texts
    async fn get_application_manifests(
        &self,
        name: &str,
        revision: Option<&str>,
    ) -> ClientResult<Vec<String>>;

    /// Managed resources with target and live states
    async fn get_managed_resources(&self, name: &str) -> ClientResult<Vec<ResourceDiff>>;

    /// Raw events payload for an application
    async fn get_application_events(&self, name: &str) -> ClientResult<Value>;

    /// List projects
    async fn list_projects(&self) -> ClientResult<Vec<Value>>;

    /// Raw events payload for a project
    async fn get_project_events(&self, name: &str) -> ClientResult<Value>;

    /// List repositories
    async fn list_repositories(&self) -> ClientResult<Vec<Value>>;

    /// List clusters
    async fn list_clusters(&self) -> ClientResult<Vec<Value>>;
}
