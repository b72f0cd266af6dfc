//! Target/live diff of an application's managed resources.

use super::{LIMIT_PROP, NAME_PROP, object_schema};
use crate::client::{ArgoClient, OUT_OF_SYNC, ResourceDiff, SYNCED};
use argomcp_core::Limits;
use argomcp_shape::{DocumentNormalizer, ResponseBounder, SequenceMode, StructuralDiffer};
use argomcp_tool::{Arguments, CallContext, Tool, ToolPayload, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// `get_application_diff`
pub struct GetApplicationDiff {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
    normalizer: DocumentNormalizer,
}

impl GetApplicationDiff {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "get_application_diff",
            "Show which resources differ between Git and the cluster, with a field-level diff",
        )
        .with_input_schema(object_schema(
            &[
                NAME_PROP,
                LIMIT_PROP,
                (
                    "match_by_name",
                    "boolean",
                    "Pair list entries such as containers by their name instead of position",
                ),
            ],
            &["name"],
        ));
        Self {
            client,
            schema,
            normalizer: DocumentNormalizer::new(),
        }
    }

    fn describe_out_of_sync(
        &self,
        resource: &ResourceDiff,
        differ: &StructuralDiffer,
        half: usize,
        truncated: &mut bool,
    ) -> Value {
        let target = ResponseBounder::truncate_chars(
            &self.normalizer.to_yaml(&resource.target_state),
            half,
        );
        let live = ResponseBounder::truncate_chars(
            &self.normalizer.to_yaml(&resource.normalized_live_state),
            half,
        );
        *truncated |= target.truncated || live.truncated;
        let report = differ.diff_documents(
            &self.normalizer,
            &resource.target_state,
            &resource.normalized_live_state,
        );
        json!({
            "group": resource.group,
            "kind": resource.kind,
            "namespace": resource.namespace,
            "name": resource.name,
            "status": OUT_OF_SYNC,
            "target": target.value,
            "live": live.value,
            "diff": report.render(),
            "changes": report.summary,
            "resource_version": resource.resource_version,
        })
    }
}

#[async_trait]
impl Tool for GetApplicationDiff {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let resources = self.client.get_managed_resources(name).await?;
        let limit = Limits::effective(ctx.limits().max_diff_resources, args.limit("limit"));
        let mode = if args.bool("match_by_name", false) {
            SequenceMode::ByIdentity
        } else {
            SequenceMode::Positional
        };
        let differ = StructuralDiffer::new().with_mode(mode);
        let half = ctx.limits().max_response_chars / 2;

        let mut truncated = false;
        let mut out_of_sync = Vec::new();
        let mut synced = Vec::new();
        for resource in &resources {
            if resource.is_out_of_sync() {
                if out_of_sync.len() < limit {
                    out_of_sync.push(self.describe_out_of_sync(
                        resource,
                        &differ,
                        half,
                        &mut truncated,
                    ));
                }
            } else if synced.len() < limit {
                synced.push(json!({
                    "group": resource.group,
                    "kind": resource.kind,
                    "namespace": resource.namespace,
                    "name": resource.name,
                    "status": SYNCED,
                }));
            }
        }
        debug!(
            application = %name,
            resources = resources.len(),
            out_of_sync = out_of_sync.len(),
            "Computed diff"
        );
        let limited = resources.len() > limit;
        Ok(ToolPayload::Value(json!({
            "application": name,
            "out_of_sync_count": out_of_sync.len(),
            "out_of_sync": out_of_sync,
            "synced": synced,
            "total": resources.len(),
            "limited": limited,
            "truncated": truncated || limited,
        })))
    }
}
