//! Dispatch core - the single chokepoint from request to response
//!
//! Resolves the tool name, invokes the bound handler with the raw argument
//! mapping and wraps the outcome into the response envelope. Handlers do
//! their own argument extraction (different tools need different
//! required/optional sets), so there is no generic pre-validation pass here.
//!
//! Each invocation is stateless and independent; the only shared resource is
//! the capability provider itself, whose OS-level side effects are the
//! domain's own global state.

use std::sync::Arc;

use serde_json::{Value, json};

use super::ToolError;
use super::codec::Args;
use super::envelope::{CallRequest, CallResponse};
use super::registry::{ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

/// Reserved name for catalog introspection, available on every transport.
pub const LIST_TOOLS: &str = "tools/list";

/// Turns [`CallRequest`]s into [`CallResponse`]s against a frozen registry
/// and an injected capability provider.
pub struct Dispatcher {
    registry: ToolRegistry,
    provider: Arc<dyn CapabilityProvider>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, provider: Arc<dyn CapabilityProvider>) -> Self {
        Self { registry, provider }
    }

    /// All registered descriptors, in registration order.
    pub fn catalog(&self) -> Vec<&ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Catalog as a wire payload: `{"tools": [...], "count": n}`.
    pub fn catalog_payload(&self) -> Value {
        let tools = self.catalog();
        json!({
            "tools": tools,
            "count": tools.len(),
        })
    }

    /// Dispatch one invocation. Never fails at this level: every error is
    /// folded into the failure branch of the envelope, so callers cannot
    /// structurally distinguish bad input from execution failure.
    pub async fn dispatch(&self, request: CallRequest) -> CallResponse {
        let CallRequest { tool, arguments, id } = request;
        tracing::debug!(tool = %tool, "dispatching tool call");

        match self.invoke(&tool, Args::new(arguments)).await {
            Ok(result) => CallResponse::success(id, result),
            Err(err) => {
                tracing::debug!(tool = %tool, error = %err, "tool call failed");
                CallResponse::failure(id, err.to_string())
            }
        }
    }

    async fn invoke(&self, tool: &str, args: Args) -> Result<Value, ToolError> {
        if tool == LIST_TOOLS {
            return Ok(self.catalog_payload());
        }

        let (_descriptor, handler) = self
            .registry
            .lookup(tool)
            .ok_or_else(|| ToolError::UnknownTool(tool.to_string()))?;

        handler(self.provider.clone(), args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{ParamKind, ToolDescriptor};
    use crate::provider::sim::SimulatedDesktop;
    use serde_json::Map;

    fn request(tool: &str, arguments: Value, id: Value) -> CallRequest {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        CallRequest::new(tool, arguments, id)
    }

    fn dispatcher_with(
        registry: ToolRegistry,
    ) -> (Dispatcher, Arc<SimulatedDesktop>) {
        let sim = Arc::new(SimulatedDesktop::new());
        let provider: Arc<dyn CapabilityProvider> = sim.clone();
        (Dispatcher::new(registry, provider), sim)
    }

    async fn echo(
        _provider: Arc<dyn CapabilityProvider>,
        args: Args,
    ) -> Result<Value, ToolError> {
        let x = args.require_i64("x")?;
        Ok(json!({"x": x}))
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolDescriptor::new("echo", "Echo the x argument")
                .required(ParamKind::Integer, "x", "X value"),
            echo,
        );
        registry
    }

    #[tokio::test]
    async fn unknown_tool_fails_without_touching_provider() {
        let (dispatcher, sim) = dispatcher_with(registry());

        let resp = dispatcher
            .dispatch(request("does_not_exist", json!({}), json!(1)))
            .await;

        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("unknown tool: does_not_exist"));
        assert_eq!(resp.id, json!(1));
        assert!(sim.calls().await.is_empty());
    }

    #[tokio::test]
    async fn missing_parameter_collapses_into_failure_envelope() {
        let (dispatcher, _sim) = dispatcher_with(registry());

        let resp = dispatcher.dispatch(request("echo", json!({}), json!("a"))).await;

        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.error.as_deref(), Some("required parameter 'x' is missing"));
    }

    #[tokio::test]
    async fn success_passes_payload_through_verbatim() {
        let (dispatcher, _sim) = dispatcher_with(registry());

        let resp = dispatcher
            .dispatch(request("echo", json!({"x": 5}), json!("b")))
            .await;

        assert!(resp.ok);
        assert_eq!(resp.result, Some(json!({"x": 5})));
        assert!(resp.error.is_none());
        assert_eq!(resp.id, json!("b"));
    }

    #[tokio::test]
    async fn list_tools_returns_catalog() {
        let (dispatcher, _sim) = dispatcher_with(registry());

        let resp = dispatcher.dispatch(request(LIST_TOOLS, json!({}), json!(2))).await;

        assert!(resp.ok);
        let result = resp.result.expect("catalog payload");
        assert_eq!(result["count"], json!(1));
        assert_eq!(result["tools"][0]["name"], json!("echo"));
    }
}
