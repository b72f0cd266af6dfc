//! Tools called by name through the registry over a snapshot.

use argomcp_argo::{ArgoClient, SnapshotClient, build_registry};
use argomcp_core::Limits;
use argomcp_tool::{Arguments, CallContext, ToolRegistry, parse_pairs};
use serde_json::{Value, json};
use std::sync::Arc;

fn snapshot() -> Value {
    let apps: Vec<Value> = (0..10)
        .map(|i| {
            json!({
                "name": format!("app-{i}"),
                "project": "default",
                "destination": {"server": "https://kubernetes.default.svc", "namespace": "apps"},
                "source": {"repoURL": "https://github.com/org/apps", "path": format!("app-{i}"), "targetRevision": "HEAD"},
                "sync": {"status": "Synced", "revision": "9e1f"},
                "health": {"status": "Healthy"}
            })
        })
        .collect();
    json!({
        "applications": apps,
        "manifests": {"app-0": [format!("{{\"kind\": \"ConfigMap\", \"data\": {{\"blob\": \"{}\"}}}}", "x".repeat(500))]},
        "managedResources": {"app-0": [{
            "kind": "ConfigMap", "name": "settings", "modified": true,
            "targetState": "{\"data\": {\"key\": \"new\"}}",
            "normalizedLiveState": "{\"data\": {\"key\": \"old\"}}"
        }]},
        "applicationEvents": {"app-1": {"items": null}},
        "projects": [{"metadata": {"name": "default"}}]
    })
}

fn registry(safe_mode: bool, limits: Limits) -> ToolRegistry {
    let client: Arc<dyn ArgoClient> =
        Arc::new(SnapshotClient::from_value(snapshot()).expect("valid snapshot"));
    build_registry(client, CallContext::new(safe_mode, limits))
}

#[tokio::test]
async fn test_list_applications_with_item_ceiling() {
    let registry = registry(
        false,
        Limits {
            max_items: 3,
            ..Limits::default()
        },
    );
    let out = registry.call("list_applications", Arguments::new()).await;
    assert!(!out.is_error, "{}", out.text);
    let value = out.json().expect("json output");
    assert_eq!(value["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["total"], 10);
    assert_eq!(value["limited"], true);
    assert_eq!(value["truncated"], true);
}

#[tokio::test]
async fn test_cli_style_arguments() {
    let registry = registry(false, Limits::default());
    let args = parse_pairs(["limit=2", "project=default"]).expect("pairs");
    let value = registry
        .call("list_applications", args)
        .await
        .json()
        .expect("json output");
    assert_eq!(value["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["total"], 10);
}

#[tokio::test]
async fn test_get_application_carries_truncated_flag() {
    let registry = registry(false, Limits::default());
    let value = registry
        .call("get_application", Arguments::new().with("name", "app-4"))
        .await
        .json()
        .expect("json output");
    assert_eq!(value["path"], "app-4");
    assert_eq!(value["has_issues"], false);
    assert_eq!(value["truncated"], false);
}

#[tokio::test]
async fn test_manifests_bounded_by_character_ceiling() {
    let registry = registry(
        false,
        Limits {
            max_response_chars: 100,
            ..Limits::default()
        },
    );
    let value = registry
        .call("get_application_manifests", Arguments::new().with("name", "app-0"))
        .await
        .json()
        .expect("json output");
    let manifest = value["manifests"][0].as_str().expect("manifest text");
    assert_eq!(manifest.chars().count(), 100);
    assert!(manifest.ends_with("..."));
    assert_eq!(value["truncated"], true);
}

#[tokio::test]
async fn test_diff_end_to_end() {
    let registry = registry(false, Limits::default());
    let value = registry
        .call("get_application_diff", Arguments::new().with("name", "app-0"))
        .await
        .json()
        .expect("json output");
    assert_eq!(value["out_of_sync"][0]["diff"], "  data.key: old -> new");
    assert_eq!(value["out_of_sync_count"], 1);
}

#[tokio::test]
async fn test_null_events_are_empty() {
    let registry = registry(false, Limits::default());
    let value = registry
        .call("get_application_events", Arguments::new().with("name", "app-1"))
        .await
        .json()
        .expect("json output");
    assert_eq!(value["total"], 0);
    assert_eq!(value["limited"], false);
}

#[tokio::test]
async fn test_safe_mode() {
    let safe = registry(true, Limits::default());
    let args = Arguments::new().with("name", "app-2");

    let refused = safe.call("delete_application", args.clone()).await;
    assert!(refused.is_error);
    assert!(refused.text.contains("'delete_application' is not allowed in safe mode"));

    let pruned = safe
        .call("sync_application", args.clone().with("prune", true))
        .await;
    assert!(pruned.is_error);

    let synced = safe.call("sync_application", args.clone()).await;
    assert!(!synced.is_error, "{}", synced.text);

    let open = registry(false, Limits::default());
    assert!(!open.call("delete_application", args.clone()).await.is_error);
    let gone = open.call("get_application", args).await;
    assert!(gone.is_error);
    assert_eq!(gone.text, "application 'app-2' not found");
}

#[tokio::test]
async fn test_errors_are_outputs() {
    let registry = registry(false, Limits::default());
    let unknown = registry.call("create_application", Arguments::new()).await;
    assert!(unknown.is_error);
    assert_eq!(unknown.text, "Unknown tool: create_application");

    let missing = registry.call("get_application", Arguments::new()).await;
    assert!(missing.is_error);
    assert_eq!(missing.text, "Invalid arguments: 'name' is required");
}
