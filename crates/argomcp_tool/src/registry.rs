//! Tool registry and dispatch.

use crate::args::Arguments;
use crate::output::ToolOutput;
use crate::schema::ToolSchema;
use crate::trait_::{CallContext, Tool, ToolError};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry for tools.
///
/// Dispatch never fails outward: unknown tools, safe-mode refusals and
/// tool errors all come back as error outputs.
pub struct ToolRegistry {
    /// Registered tools by name, in registration order
    tools: IndexMap<String, Arc<dyn Tool>>,
    ctx: CallContext,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(ctx: CallContext) -> Self {
        Self {
            tools: IndexMap::new(),
            ctx,
        }
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Replaced previously registered tool");
        }
    }

    /// Registered tool names
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Schemas of all tools
    #[must_use]
    pub fn schemas(&self) -> Vec<&ToolSchema> {
        self.tools.values().map(|tool| tool.schema()).collect()
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of tools
    #[must_use]
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Context passed to every call
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Call a tool by name and shape its result
    pub async fn call(&self, name: &str, args: Arguments) -> ToolOutput {
        debug!(tool = %name, safe_mode = self.ctx.safe_mode, "Calling tool");
        match self.dispatch(name, &args).await {
            Ok(text) => ToolOutput::success(text),
            Err(e) => {
                match &e {
                    ToolError::SafeMode { .. } => warn!(tool = %name, "Refused in safe mode"),
                    other => debug!(tool = %name, error = %other, "Tool call failed"),
                }
                ToolOutput::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, args: &Arguments) -> Result<String, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        if tool.schema().is_write() {
            self.ctx.ensure_writable(name)?;
        }
        let payload = tool.call(args, &self.ctx).await?;
        payload.shape(&self.ctx.bounder)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(CallContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ToolPayload;
    use crate::schema::SideEffect;
    use crate::trait_::ToolResult;
    use argomcp_core::Limits;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool {
        schema: ToolSchema,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> &ToolSchema {
            &self.schema
        }

        async fn call(&self, args: &Arguments, _ctx: &CallContext) -> ToolResult<ToolPayload> {
            let name = args.required_string("name")?;
            Ok(ToolPayload::Value(json!({"echo": name})))
        }
    }

    fn make_tool(name: &str, effect: SideEffect) -> Arc<dyn Tool> {
        Arc::new(EchoTool {
            schema: ToolSchema::new(name, "Echo the name argument").with_side_effect(effect),
        })
    }

    fn registry(safe_mode: bool) -> ToolRegistry {
        let mut registry = ToolRegistry::new(CallContext::new(safe_mode, Limits::default()));
        registry.register(make_tool("echo", SideEffect::Read));
        registry.register(make_tool("erase", SideEffect::Write));
        registry
    }

    #[test]
    fn test_registry_list() {
        let registry = registry(false);
        assert_eq!(registry.list(), vec!["echo", "erase"]);
        assert_eq!(registry.count(), 2);
        assert!(registry.contains("echo"));
        assert_eq!(registry.schemas()[1].side_effect, SideEffect::Write);
        assert!(ToolRegistry::default().is_empty());
    }

    #[tokio::test]
    async fn test_call_success() {
        let out = registry(false)
            .call("echo", Arguments::new().with("name", "guestbook"))
            .await;
        assert!(!out.is_error);
        assert_eq!(out.json(), Some(json!({"echo": "guestbook", "truncated": false})));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let out = registry(false).call("nope", Arguments::new()).await;
        assert!(out.is_error);
        assert_eq!(out.text, "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_call_invalid_arguments() {
        let out = registry(false).call("echo", Arguments::new()).await;
        assert!(out.is_error);
        assert!(out.text.contains("'name' is required"));
    }

    #[tokio::test]
    async fn test_safe_mode_refuses_writes() {
        let args = Arguments::new().with("name", "guestbook");
        let safe = registry(true);
        let refused = safe.call("erase", args.clone()).await;
        assert!(refused.is_error);
        assert!(refused.text.contains("not allowed in safe mode"));
        assert!(!safe.call("echo", args.clone()).await.is_error);
        assert!(!registry(false).call("erase", args).await.is_error);
    }
}
