//! Application and project events.

use super::{LIMIT_PROP, object_schema};
use crate::client::ArgoClient;
use argomcp_shape::{EventFilter, EventRecord, normalize_events};
use argomcp_tool::{Arguments, CallContext, Tool, ToolPayload, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Bounded `{items, total, limited, truncated}` listing of events
fn event_listing(
    events: &[EventRecord],
    args: &Arguments,
    ctx: &CallContext,
) -> ToolResult<serde_json::Map<String, Value>> {
    let items = events
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let listing = ctx
        .bounder
        .bound_list(&items, ctx.limits().max_events, args.limit("limit"));
    match serde_json::to_value(listing)? {
        Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// `get_application_events`
pub struct GetApplicationEvents {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl GetApplicationEvents {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "get_application_events",
            "Get Kubernetes events for an application, optionally for one resource",
        )
        .with_input_schema(object_schema(
            &[
                ("name", "string", "Application name"),
                ("resource_name", "string", "Only events about this resource"),
                ("resource_kind", "string", "Only events about resources of this kind"),
                LIMIT_PROP,
            ],
            &["name"],
        ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for GetApplicationEvents {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let raw = self.client.get_application_events(name).await?;
        let filter = EventFilter::new(
            args.opt_string("resource_kind"),
            args.opt_string("resource_name"),
        );
        let events = filter.apply(normalize_events(&raw)?);
        let mut listing = event_listing(&events, args, ctx)?;
        listing.insert("filtered".to_string(), Value::Bool(filter.is_active()));
        Ok(ToolPayload::Value(Value::Object(listing)))
    }
}

/// `get_project_events`
pub struct GetProjectEvents {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl GetProjectEvents {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new("get_project_events", "Get events for a project")
            .with_input_schema(object_schema(
                &[("name", "string", "Project name"), LIMIT_PROP],
                &["name"],
            ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for GetProjectEvents {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let raw = self.client.get_project_events(name).await?;
        let events = normalize_events(&raw)?;
        Ok(ToolPayload::Value(Value::Object(event_listing(
            &events, args, ctx,
        )?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotClient;
    use argomcp_tool::ToolError;
    use serde_json::json;

    fn client() -> Arc<dyn ArgoClient> {
        let events: Vec<Value> = (0..30)
            .map(|i| {
                json!({
                    "type": if i % 3 == 0 { "Warning" } else { "Normal" },
                    "reason": format!("Reason{i}"),
                    "message": "msg",
                    "lastTimestamp": "2026-03-01T10:00:00Z",
                    "involvedObject": {
                        "kind": if i % 2 == 0 { "Pod" } else { "Deployment" },
                        "name": format!("web-{}", i % 5)
                    }
                })
            })
            .collect();
        Arc::new(
            SnapshotClient::from_value(json!({
                "applications": [{"name": "guestbook"}, {"name": "broken"}],
                "applicationEvents": {
                    "guestbook": {"items": events},
                    "broken": {}
                },
                "projectEvents": {"default": [{"type": "Normal", "reason": "Created"}]}
            }))
            .unwrap(),
        )
    }

    async fn call_app(args: Arguments) -> ToolResult<Value> {
        let tool = GetApplicationEvents::new(client());
        match tool.call(&args, &CallContext::default()).await? {
            ToolPayload::Value(value) => Ok(value),
            ToolPayload::List { .. } => panic!("expected value"),
        }
    }

    #[tokio::test]
    async fn test_events_bounded() {
        let value = call_app(Arguments::new().with("name", "guestbook")).await.unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 20);
        assert_eq!(value["total"], 30);
        assert_eq!(value["limited"], true);
        assert_eq!(value["filtered"], false);
        assert_eq!(
            value["items"][0],
            json!({"type": "Warning", "reason": "Reason0", "message": "msg",
                   "timestamp": "2026-03-01T10:00:00Z"})
        );
    }

    #[tokio::test]
    async fn test_events_filtered() {
        let args = Arguments::new()
            .with("name", "guestbook")
            .with("resource_kind", "Pod")
            .with("resource_name", "web-0");
        let value = call_app(args).await.unwrap();
        // i even and i % 5 == 0: 0, 10, 20
        assert_eq!(value["total"], 3);
        assert_eq!(value["filtered"], true);
        assert_eq!(value["limited"], false);
    }

    #[tokio::test]
    async fn test_events_malformed() {
        let err = call_app(Arguments::new().with("name", "broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MalformedEvents(_)));
        assert!(err.to_string().starts_with("Failed to parse events"));
    }

    #[tokio::test]
    async fn test_project_events() {
        let tool = GetProjectEvents::new(client());
        let payload = tool
            .call(&Arguments::new().with("name", "default"), &CallContext::default())
            .await
            .unwrap();
        let ToolPayload::Value(value) = payload else {
            panic!("expected value");
        };
        assert_eq!(value["total"], 1);
        assert_eq!(value["items"][0]["reason"], "Created");
        assert_eq!(value["items"][0]["timestamp"], "");
    }
}
