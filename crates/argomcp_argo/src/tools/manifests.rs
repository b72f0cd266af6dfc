//! Rendered manifests of an application.

use super::{NAME_PROP, object_schema};
use crate::client::ArgoClient;
use argomcp_shape::{DocumentNormalizer, ResponseBounder};
use argomcp_tool::{Arguments, CallContext, Tool, ToolPayload, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// `get_application_manifests`
pub struct GetApplicationManifests {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
    normalizer: DocumentNormalizer,
}

impl GetApplicationManifests {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "get_application_manifests",
            "Get the rendered Kubernetes manifests of an application as YAML",
        )
        .with_input_schema(object_schema(
            &[NAME_PROP, ("revision", "string", "Revision to render")],
            &["name"],
        ));
        Self {
            client,
            schema,
            normalizer: DocumentNormalizer::new(),
        }
    }
}

#[async_trait]
impl Tool for GetApplicationManifests {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let manifests = self
            .client
            .get_application_manifests(name, args.opt_string("revision"))
            .await?;
        let ceiling = ctx.limits().max_manifests;
        let total = manifests.len();
        let mut truncated = total > ceiling;
        let yaml: Vec<String> = manifests
            .iter()
            .take(ceiling)
            .map(|text| {
                let bounded = ResponseBounder::truncate_chars(
                    &self.normalizer.to_yaml(text),
                    ctx.limits().max_response_chars,
                );
                truncated |= bounded.truncated;
                bounded.value
            })
            .collect();
        Ok(ToolPayload::Value(json!({
            "manifests": yaml,
            "count": yaml.len(),
            "total": total,
            "limited": total > ceiling,
            "truncated": truncated,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotClient;
    use argomcp_core::Limits;
    use serde_json::Value;

    fn client(count: usize) -> Arc<dyn ArgoClient> {
        let manifests: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"apiVersion":"v1","kind":"ConfigMap","metadata":{{"name":"cm-{i}","managedFields":[{{"manager":"kubectl"}}]}},"managedFields":[{{"manager":"argocd"}}]}}"#
                )
            })
            .collect();
        Arc::new(
            SnapshotClient::from_value(json!({
                "applications": [{"name": "guestbook", "source": {"targetRevision": "HEAD"}}],
                "manifests": {"guestbook": manifests}
            }))
            .unwrap(),
        )
    }

    async fn call(count: usize, limits: Limits) -> Value {
        let tool = GetApplicationManifests::new(client(count));
        let ctx = CallContext::new(false, limits);
        let ToolPayload::Value(value) = tool
            .call(&Arguments::new().with("name", "guestbook"), &ctx)
            .await
            .unwrap()
        else {
            panic!("expected value");
        };
        value
    }

    #[tokio::test]
    async fn test_manifests_as_yaml() {
        let value = call(2, Limits::default()).await;
        assert_eq!(value["count"], 2);
        assert_eq!(value["limited"], false);
        let first = value["manifests"][0].as_str().unwrap();
        assert!(first.contains("kind: ConfigMap"));
        assert!(first.contains("name: cm-0"));
        // only the top-level field is stripped
        assert!(first.contains("manager: kubectl"));
        assert!(!first.contains("manager: argocd"));
    }

    #[tokio::test]
    async fn test_manifests_limited() {
        let limits = Limits {
            max_manifests: 3,
            ..Limits::default()
        };
        let value = call(5, limits).await;
        assert_eq!(value["count"], 3);
        assert_eq!(value["total"], 5);
        assert_eq!(value["limited"], true);
        assert_eq!(value["truncated"], true);
    }
}
