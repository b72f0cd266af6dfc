//! Projects, repositories, and clusters.

use super::{LIMIT_PROP, object_schema};
use crate::client::ArgoClient;
use argomcp_tool::{Arguments, CallContext, Tool, ToolPayload, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// First string found at any of `pointers`, or empty
fn text_at(value: &Value, pointers: &[&str]) -> String {
    pointers
        .iter()
        .find_map(|p| value.pointer(p).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn project_row(project: &Value) -> Value {
    json!({
        "name": text_at(project, &["/metadata/name", "/name"]),
        "description": text_at(project, &["/spec/description", "/description"]),
    })
}

fn repository_row(repo: &Value) -> Value {
    json!({
        "repo": text_at(repo, &["/repo"]),
        "type": text_at(repo, &["/type"]),
        "name": text_at(repo, &["/name"]),
    })
}

fn cluster_row(cluster: &Value) -> Value {
    json!({
        "server": text_at(cluster, &["/server"]),
        "name": text_at(cluster, &["/name"]),
    })
}

/// Rows whose `field` equals the non-empty `filter` argument
fn filter_rows(rows: Vec<Value>, field: &str, filter: Option<&str>) -> Vec<Value> {
    match filter {
        Some(wanted) => rows
            .into_iter()
            .filter(|row| row.get(field).and_then(Value::as_str) == Some(wanted))
            .collect(),
        None => rows,
    }
}

/// `list_projects`
pub struct ListProjects {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl ListProjects {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new("list_projects", "List Argo CD projects").with_input_schema(
            object_schema(
                &[("name", "string", "Filter by project name"), LIMIT_PROP],
                &[],
            ),
        );
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for ListProjects {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let rows = self.client.list_projects().await?.iter().map(project_row).collect();
        Ok(ToolPayload::list(
            filter_rows(rows, "name", args.opt_string("name")),
            ctx.limits().max_items,
            args.limit("limit"),
        ))
    }
}

/// `list_repositories`
pub struct ListRepositories {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl ListRepositories {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new("list_repositories", "List registered repositories")
            .with_input_schema(object_schema(
                &[("repo_url", "string", "Filter by repository URL"), LIMIT_PROP],
                &[],
            ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for ListRepositories {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let rows = self
            .client
            .list_repositories()
            .await?
            .iter()
            .map(repository_row)
            .collect();
        Ok(ToolPayload::list(
            filter_rows(rows, "repo", args.opt_string("repo_url")),
            ctx.limits().max_items,
            args.limit("limit"),
        ))
    }
}

/// `list_clusters`
pub struct ListClusters {
    client: Arc<dyn ArgoClient>,
    schema: ToolSchema,
}

impl ListClusters {
    /// Create the tool
    #[must_use]
    pub fn new(client: Arc<dyn ArgoClient>) -> Self {
        let schema = ToolSchema::new("list_clusters", "List clusters known to Argo CD")
            .with_input_schema(object_schema(
                &[("server", "string", "Filter by API server URL"), LIMIT_PROP],
                &[],
            ));
        Self { client, schema }
    }
}

#[async_trait]
impl Tool for ListClusters {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, args: &Arguments, ctx: &CallContext) -> ToolResult<ToolPayload> {
        let rows = self
            .client
            .list_clusters()
            .await?
            .iter()
            .map(cluster_row)
            .collect();
        Ok(ToolPayload::list(
            filter_rows(rows, "server", args.opt_string("server")),
            ctx.limits().max_items,
            args.limit("limit"),
        ))
    }
}
