//! Application listing, detail, sync, and delete.

use super::{LIMIT_PROP, NAME_PROP, object_schema};
use crate::client::{ApplicationQuery, ArgoClient, SyncRequest};
use crate::format::{ApplicationDetail, ApplicationSummary};
use argomcp_tool::{
    Arguments, CallContext, SideEffect, Tool, ToolError, ToolPayload, ToolResult, ToolSchema,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// `list_applications`
pub struct ListApplications {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl ListApplications {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "list_applications",
            "List Argo CD applications with sync and health status",
        )
        .with_input_schema(object_schema(
            &[
                ("name", "string", "Filter by application name"),
                ("project", "string", "Filter by project"),
                LIMIT_PROP,
            ],
            &[],
        ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for ListApplications {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let query = ApplicationQuery {
            name: args.opt_string("name").map(str::to_string),
            project: args.opt_string("project").map(str::to_string),
        };
        let apps = self.client.list_applications(&query).await?;
        let items = apps
            .iter()
            .map(|app| serde_json::to_value(ApplicationSummary::from(app)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ToolPayload::list(
            items,
            ctx.limits().max_items,
            args.limit("limit"),
        ))
    }
}

/// `get_application`
pub struct GetApplication {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl GetApplication {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "get_application",
            "Get details of an application including source, destination, and conditions",
        )
        .with_input_schema(object_schema(&[NAME_PROP], &["name"]));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for GetApplication {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, _ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let app = self.client.get_application(name).await?;
        ToolPayload::from_serialize(&ApplicationDetail::from(&app))
    }
}

/// `sync_application`
///
/// Allowed in safe mode unless `prune` is set.
pub struct SyncApplication {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl SyncApplication {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new(
            "sync_application",
            "Sync an application to its target revision",
        )
        .with_input_schema(object_schema(
            &[
                NAME_PROP,
                ("revision", "string", "Revision to sync to"),
                ("prune", "boolean", "Delete resources no longer defined in Git"),
            ],
            &["name"],
        ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for SyncApplication {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let prune = args.bool("prune", false);
        if prune && ctx.safe_mode {
            return Err(ToolError::SafeMode {
                operation: "sync_application with prune=true".to_string(),
            });
        }
        let request = SyncRequest {
            name: name.to_string(),
            revision: args.opt_string("revision").map(str::to_string),
            prune,
        };
        let app = self.client.sync_application(&request).await?;
        info!(application = %name, prune, "Sync initiated");
        Ok(ToolPayload::Value(json!({
            "message": format!("Application {name} sync initiated"),
            "status": app.sync.status,
            "health": app.health.status,
            "revision": app.sync.revision,
        })))
    }
}

/// `delete_application`
pub struct DeleteApplication {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl DeleteApplication {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new("delete_application", "Delete an application")
            .with_input_schema(object_schema(
                &[
                    NAME_PROP,
                    ("cascade", "boolean", "Also delete the application's resources"),
                ],
                &["name"],
            ))
            .with_side_effect(SideEffect::Write);
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for DeleteApplication {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, _ctx: &CallContext) -> ToolResult<ToolPayload> {
        let name = args.required_string("name")?;
        let cascade = args.bool("cascade", true);
        self.client.delete_application(name, cascade).await?;
        info!(application = %name, cascade, "Application deleted");
        Ok(ToolPayload::Value(json!({
            "message": format!("Application {name} deleted successfully"),
            "success": true,
        })))
    }
}
