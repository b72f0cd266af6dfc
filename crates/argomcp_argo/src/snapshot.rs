//! Offline client backed by a JSON snapshot of platform state.

use crate::client::{
    Application, ApplicationQuery, ArgoClient, ClientError, ClientResult, OperationState,
    ResourceDiff, SYNCED, SyncRequest,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Platform state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    /// Applications
    pub applications: Vec<Application>,
    /// Rendered manifests (JSON texts) by application
    pub manifests: BTreeMap<String, Vec<String>>,
    /// Managed resources by application
    pub managed_resources: BTreeMap<String, Vec<ResourceDiff>>,
    /// Raw events payloads by application
    pub application_events: BTreeMap<String, Value>,
    /// Raw events payloads by project
    pub project_events: BTreeMap<String, Value>,
    /// Projects
    pub projects: Vec<Value>,
    /// Repositories
    pub repositories: Vec<Value>,
    /// Clusters
    pub clusters: Vec<Value>,
}

/// [`ArgoClient`] over an in-memory [`Snapshot`].
///
/// Writes (sync, delete) change the in-memory state only.
#[derive(Debug, Default)]
pub struct SnapshotClient {
    state: RwLock<Snapshot>,
}

impl SnapshotClient {
    /// Client over `snapshot`
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Client over a JSON value
    ///
    /// # Errors
    ///
    /// Returns error if the value is not a snapshot
    pub fn from_value(value: Value) -> ClientResult<Self> {
        Ok(Self::new(serde_json::from_value(value)?))
    }

    /// Client over JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a snapshot
    pub fn from_json_str(text: &str) -> ClientResult<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Client over a snapshot file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a snapshot
    pub async fn load(path: &Path) -> ClientResult<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ClientError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;
        let snapshot: Snapshot = serde_json::from_str(&text)?;
        info!(
            path = %path.display(),
            applications = snapshot.applications.len(),
            "Loaded snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    async fn require_application(&self, name: &str) -> ClientResult<Application> {
        self.state
            .read()
            .await
            .applications
            .iter()
            .find(|app| app.name == name)
            .cloned()
            .ok_or_else(|| not_found("application", name))
    }
}

fn not_found(kind: &'static str, name: &str) -> ClientError {
    ClientError::NotFound {
        kind,
        name: name.to_string(),
    }
}

fn no_events() -> Value {
    json!({"items": []})
}

/// Object name from `metadata.name`, falling back to a top-level `name`
fn object_name(value: &Value) -> Option<&str> {
    value
        .pointer("/metadata/name")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)
}

#[async_trait]
impl ArgoClient for SnapshotClient {
    async fn list_applications(&self, query: &ApplicationQuery) -> ClientResult<Vec<Application>> {
        Ok(self
            .state
            .read()
            .await
            .applications
            .iter()
            .filter(|app| query.matches(app))
            .cloned()
            .collect())
    }

    async fn get_application(&self, name: &str) -> ClientResult<Application> {
        self.require_application(name).await
    }

    async fn sync_application(&self, request: &SyncRequest) -> ClientResult<Application> {
        let mut state = self.state.write().await;
        let app = state
            .applications
            .iter_mut()
            .find(|app| app.name == request.name)
            .ok_or_else(|| not_found("application", &request.name))?;
        let revision = request
            .revision
            .clone()
            .unwrap_or_else(|| app.source.target_revision.clone());
        debug!(application = %request.name, %revision, prune = request.prune, "Syncing");
        app.sync.status = SYNCED.to_string();
        app.sync.revision = revision;
        for resource in &mut app.resources {
            resource.status = SYNCED.to_string();
        }
        app.operation = Some(OperationState {
            phase: "Succeeded".to_string(),
            message: "successfully synced (all tasks run)".to_string(),
        });
        let updated = app.clone();
        if let Some(resources) = state.managed_resources.get_mut(&request.name) {
            for resource in resources.iter_mut() {
                resource.normalized_live_state = resource.target_state.clone();
                resource.modified = false;
                resource.diff.clear();
            }
        }
        Ok(updated)
    }

    async fn delete_application(&self, name: &str, cascade: bool) -> ClientResult<()> {
        let mut state = self.state.write().await;
        let before = state.applications.len();
        state.applications.retain(|app| app.name != name);
        if state.applications.len() == before {
            return Err(not_found("application", name));
        }
        state.manifests.remove(name);
        state.managed_resources.remove(name);
        state.application_events.remove(name);
        debug!(application = %name, cascade, "Deleted");
        Ok(())
    }

    async fn get_application_manifests(
        &self,
        name: &str,
        revision: Option<&str>,
    ) -> ClientResult<Vec<String>> {
        let app = self.require_application(name).await?;
        if let Some(revision) = revision {
            if revision != app.source.target_revision && revision != app.sync.revision {
                return Err(ClientError::Rejected(format!(
                    "revision '{revision}' is not available offline for application '{name}'"
                )));
            }
        }
        Ok(self
            .state
            .read()
            .await
            .manifests
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_managed_resources(&self, name: &str) -> ClientResult<Vec<ResourceDiff>> {
        self.require_application(name).await?;
        Ok(self
            .state
            .read()
            .await
            .managed_resources
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_application_events(&self, name: &str) -> ClientResult<Value> {
        self.require_application(name).await?;
        Ok(self
            .state
            .read()
            .await
            .application_events
            .get(name)
            .cloned()
            .unwrap_or_else(no_events))
    }

    async fn list_projects(&self) -> ClientResult<Vec<Value>> {
        Ok(self.state.read().await.projects.clone())
    }

    async fn get_project_events(&self, name: &str) -> ClientResult<Value> {
        let state = self.state.read().await;
        if let Some(events) = state.project_events.get(name) {
            return Ok(events.clone());
        }
        if state.projects.iter().any(|p| object_name(p) == Some(name)) {
            return Ok(no_events());
        }
        Err(not_found("project", name))
    }

    async fn list_repositories(&self) -> ClientResult<Vec<Value>> {
        Ok(self.state.read().await.repositories.clone())
    }

    async fn list_clusters(&self) -> ClientResult<Vec<Value>> {
        Ok(self.state.read().await.clusters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn client() -> SnapshotClient {
        SnapshotClient::from_value(json!({
            "applications": [
                {"name": "guestbook", "project": "default",
                 "source": {"targetRevision": "HEAD"},
                 "sync": {"status": "OutOfSync", "revision": "abc123"},
                 "resources": [{"kind": "Deployment", "name": "guestbook-ui", "status": "OutOfSync"}]},
                {"name": "billing", "project": "finance"}
            ],
            "manifests": {"guestbook": ["{\"kind\": \"Service\"}"]},
            "managedResources": {"guestbook": [
                {"kind": "Deployment", "name": "guestbook-ui", "modified": true,
                 "targetState": "{\"spec\": {\"replicas\": 3}}",
                 "normalizedLiveState": "{\"spec\": {\"replicas\": 1}}"}
            ]},
            "projects": [{"metadata": {"name": "default"}}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let client = client();
        assert_eq!(client.list_applications(&ApplicationQuery::default()).await.unwrap().len(), 2);
        let finance = ApplicationQuery {
            project: Some("finance".to_string()),
            ..ApplicationQuery::default()
        };
        let apps = client.list_applications(&finance).await.unwrap();
        assert_eq!(apps[0].name, "billing");
        assert!(matches!(
            client.get_application("nope").await,
            Err(ClientError::NotFound { kind: "application", .. })
        ));
    }

    #[tokio::test]
    async fn test_sync_updates_state() {
        let client = client();
        let app = client
            .sync_application(&SyncRequest {
                name: "guestbook".to_string(),
                revision: None,
                prune: false,
            })
            .await
            .unwrap();
        assert_eq!(app.sync.status, "Synced");
        assert_eq!(app.sync.revision, "HEAD");
        assert_eq!(app.out_of_sync_count(), 0);

        let resources = client.get_managed_resources("guestbook").await.unwrap();
        assert!(!resources[0].is_out_of_sync());
    }

    #[tokio::test]
    async fn test_delete() {
        let client = client();
        client.delete_application("guestbook", true).await.unwrap();
        assert!(client.get_application("guestbook").await.is_err());
        assert!(client.snapshot().await.manifests.is_empty());
        assert!(client.delete_application("guestbook", true).await.is_err());
    }

    #[tokio::test]
    async fn test_manifests_revision() {
        let client = client();
        assert_eq!(client.get_application_manifests("guestbook", None).await.unwrap().len(), 1);
        assert!(client.get_application_manifests("guestbook", Some("abc123")).await.is_ok());
        assert!(matches!(
            client.get_application_manifests("guestbook", Some("v9")).await,
            Err(ClientError::Rejected(_))
        ));
        assert!(client.get_application_manifests("billing", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_defaults() {
        let client = client();
        assert_eq!(client.get_application_events("billing").await.unwrap(), no_events());
        assert_eq!(client.get_project_events("default").await.unwrap(), no_events());
        assert!(client.get_project_events("unknown").await.is_err());
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clusters": [{{"server": "https://kubernetes.default.svc"}}]}}"#).unwrap();
        let client = SnapshotClient::load(file.path()).await.unwrap();
        assert_eq!(client.list_clusters().await.unwrap().len(), 1);

        let missing = SnapshotClient::load(Path::new("/nonexistent/snapshot.json")).await;
        assert!(matches!(missing, Err(ClientError::Snapshot { .. })));
    }

    #[test]
    fn test_invalid_snapshot() {
        assert!(matches!(
            SnapshotClient::from_json_str(r#"{"applications": 3}"#),
            Err(ClientError::Decode(_))
        ));
    }
}
