//! Application views returned by the tools.

use crate::client::Application;
use serde::Serialize;

/// One row of an application listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ApplicationSummary {
    pub name: String,
    pub project: String,
    pub server: String,
    pub namespace: String,
    pub status: String,
    pub health: String,
    pub out_of_sync_count: usize,
    pub has_issues: bool,
}

impl From<&Application> for ApplicationSummary {
    fn from(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            project: app.project.clone(),
            server: app.destination.server.clone(),
            namespace: app.destination.namespace.clone(),
            status: app.sync.status.clone(),
            health: app.health.status.clone(),
            out_of_sync_count: app.out_of_sync_count(),
            has_issues: app.has_issues(),
        }
    }
}

/// Condition as shown to a reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ConditionView {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub message: String,
}

/// Full view of one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ApplicationDetail {
    pub name: String,
    pub project: String,
    pub repo_url: String,
    pub path: String,
    pub target_revision: String,
    pub server: String,
    pub namespace: String,
    pub status: String,
    pub health: String,
    pub health_message: String,
    pub revision: String,
    pub out_of_sync_count: usize,
    pub has_issues: bool,
    pub operation_phase: String,
    pub operation_message: String,
    pub conditions: Vec<ConditionView>,
}

impl From<&Application> for ApplicationDetail {
    fn from(app: &Application) -> Self {
        let (operation_phase, operation_message) = app
            .operation
            .as_ref()
            .map(|op| (op.phase.clone(), op.message.clone()))
            .unwrap_or_default();
        Self {
            name: app.name.clone(),
            project: app.project.clone(),
            repo_url: app.source.repo_url.clone(),
            path: app.source.path.clone(),
            target_revision: app.source.target_revision.clone(),
            server: app.destination.server.clone(),
            namespace: app.destination.namespace.clone(),
            status: app.sync.status.clone(),
            health: app.health.status.clone(),
            health_message: app.health.message.clone(),
            revision: app.sync.revision.clone(),
            out_of_sync_count: app.out_of_sync_count(),
            has_issues: app.has_issues(),
            operation_phase,
            operation_message,
            conditions: app
                .conditions
                .iter()
                .map(|c| ConditionView {
                    condition_type: c.condition_type.clone(),
                    message: c.message.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guestbook() -> Application {
        serde_json::from_value(json!({
            "name": "guestbook",
            "project": "default",
            "destination": {"server": "https://kubernetes.default.svc", "namespace": "web"},
            "source": {"repoURL": "https://github.com/argoproj/argocd-example-apps", "path": "guestbook", "targetRevision": "HEAD"},
            "sync": {"status": "OutOfSync", "revision": "4f1c2a"},
            "health": {"status": "Degraded", "message": "replica set unavailable"},
            "operation": {"phase": "Failed", "message": "one or more objects failed"},
            "conditions": [{"type": "SyncError", "message": "failed to apply"}],
            "resources": [
                {"kind": "Deployment", "status": "OutOfSync"},
                {"kind": "Service", "status": "Synced"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let summary = ApplicationSummary::from(&guestbook());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["server"], "https://kubernetes.default.svc");
        assert_eq!(value["out_of_sync_count"], 1);
        assert_eq!(value["has_issues"], true);
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_detail() {
        let detail = ApplicationDetail::from(&guestbook());
        assert_eq!(detail.repo_url, "https://github.com/argoproj/argocd-example-apps");
        assert_eq!(detail.operation_phase, "Failed");
        assert_eq!(detail.health_message, "replica set unavailable");
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["conditions"][0]["type"], "SyncError");
    }

    #[test]
    fn test_detail_without_operation() {
        let app = Application {
            name: "idle".to_string(),
            ..Application::default()
        };
        let detail = ApplicationDetail::from(&app);
        assert_eq!(detail.operation_phase, "");
        assert!(detail.conditions.is_empty());
    }
}
