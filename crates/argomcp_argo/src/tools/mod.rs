//! MCP tools over an [`ArgoClient`].

mod applications;
mod diff;
mod events;
mod inventory;
mod manifests;

pub use applications::{DeleteApplication, GetApplication, ListApplications, SyncApplication};
pub use diff::GetApplicationDiff;
pub use events::{GetApplicationEvents, GetProjectEvents};
pub use inventory::{ListClusters, ListProjects, ListRepositories};
pub use manifests::GetApplicationManifests;

use crate::client::{ArgoClient, ClientError};
use argomcp_tool::{CallContext, ToolError, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;

impl From<ClientError> for ToolError {
    fn from(err: ClientError) -> Self {
        ToolError::Platform(err.to_string())
    }
}

/// Register every tool backed by `client`
pub fn register_all(registry: &mut ToolRegistry, client: &Arc<dyn ArgoClient>) {
    registry.register(Arc::new(ListApplications::new(Arc::clone(client))));
    registry.register(Arc::new(GetApplication::new(Arc::clone(client))));
    registry.register(Arc::new(SyncApplication::new(Arc::clone(client))));
    registry.register(Arc::new(DeleteApplication::new(Arc::clone(client))));
    registry.register(Arc::new(GetApplicationManifests::new(Arc::clone(client))));
    registry.register(Arc::new(GetApplicationDiff::new(Arc::clone(client))));
    registry.register(Arc::new(GetApplicationEvents::new(Arc::clone(client))));
    registry.register(Arc::new(ListProjects::new(Arc::clone(client))));
    registry.register(Arc::new(GetProjectEvents::new(Arc::clone(client))));
    registry.register(Arc::new(ListRepositories::new(Arc::clone(client))));
    registry.register(Arc::new(ListClusters::new(Arc::clone(client))));
}

/// Registry with every tool registered
#[must_use]
pub fn build_registry(client: Arc<dyn ArgoClient>, ctx: CallContext) -> ToolRegistry {
    let mut registry = ToolRegistry::new(ctx);
    register_all(&mut registry, &client);
    registry
}

/// Arguments schema from `(name, type, description)` properties
fn object_schema(properties: &[(&str, &str, &str)], required: &[&str]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, kind, description)| {
            (
                (*name).to_string(),
                json!({"type": kind, "description": description}),
            )
        })
        .collect();
    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

const NAME_PROP: (&str, &str, &str) = ("name", "string", "Application name");
const LIMIT_PROP: (&str, &str, &str) = ("limit", "integer", "Maximum number of items to return");
