//! Tool registry - name to descriptor/handler mapping, built once at startup
//!
//! Descriptors are declarative: a tool name, a human description and an
//! ordered parameter list with required/optional markers. The registry is
//! frozen after startup, so lookups need no locking.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::ToolError;
use super::codec::Args;
use crate::provider::CapabilityProvider;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    Integer,
    Float,
    String,
    Boolean,
    StringList,
}

/// A single parameter in a tool's schema.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
}

/// Declarative schema for one tool: name, description and parameter list.
///
/// Immutable once registered; lives for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a required parameter. Required parameters have no default;
    /// dispatch fails before the handler touches the provider if one is
    /// absent.
    pub fn required(mut self, kind: ParamKind, name: &str, description: &str) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.to_string(),
            kind,
            required: true,
            description: description.to_string(),
        });
        self
    }

    /// Append an optional parameter.
    pub fn optional(mut self, kind: ParamKind, name: &str, description: &str) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.to_string(),
            kind,
            required: false,
            description: description.to_string(),
        });
        self
    }
}

/// Handler bound to a tool name: extracts its own arguments and delegates to
/// the capability provider.
pub type ToolHandler = Arc<
    dyn Fn(Arc<dyn CapabilityProvider>, Args) -> BoxFuture<'static, Result<Value, ToolError>>
        + Send
        + Sync,
>;

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: ToolHandler,
}

/// Mapping from tool name to descriptor and handler.
///
/// Built once during startup registration and read-only afterwards.
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    // Registration order, for deterministic catalog listing.
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Plain `async fn(provider, args)` handlers are
    /// accepted directly.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor name is already registered. A name collision
    /// is a programming error that must stop the process at startup, not a
    /// runtime condition.
    pub fn register<F, Fut>(&mut self, descriptor: ToolDescriptor, handler: F)
    where
        F: Fn(Arc<dyn CapabilityProvider>, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let name = descriptor.name.clone();
        if self.tools.contains_key(&name) {
            panic!("duplicate tool registration: {name}");
        }

        let handler: ToolHandler = Arc::new(move |provider, args| Box::pin(handler(provider, args)));
        self.order.push(name.clone());
        self.tools.insert(name, RegisteredTool { descriptor, handler });
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Option<(&ToolDescriptor, ToolHandler)> {
        self.tools
            .get(name)
            .map(|tool| (&tool.descriptor, tool.handler.clone()))
    }

    /// All descriptors in registration order, for capability discovery.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name).map(|tool| &tool.descriptor))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn noop(
        _provider: Arc<dyn CapabilityProvider>,
        _args: Args,
    ) -> Result<Value, ToolError> {
        Ok(json!({"status": "success"}))
    }

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, "test tool")
            .required(ParamKind::Integer, "x", "X coordinate")
            .optional(ParamKind::String, "button", "Mouse button")
    }

    #[test]
    fn lookup_returns_registered_descriptor() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("mouse_move"), noop);

        let (desc, _handler) = registry.lookup("mouse_move").expect("registered tool");
        assert_eq!(desc.name, "mouse_move");
        assert_eq!(desc.parameters.len(), 2);
        assert!(desc.parameters[0].required);
        assert!(!desc.parameters[1].required);
    }

    #[test]
    fn lookup_unknown_is_none() {
        let registry = ToolRegistry::new();
        assert!(registry.lookup("does_not_exist").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate tool registration: mouse_move")]
    fn duplicate_registration_is_fatal() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("mouse_move"), noop);
        registry.register(descriptor("mouse_move"), noop);
    }

    #[test]
    fn descriptors_preserve_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(ToolDescriptor::new(name, "test"), noop);
        }
        let names: Vec<_> = registry.descriptors().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn descriptor_serializes_kinds_kebab_case() {
        let desc = ToolDescriptor::new("t", "test")
            .optional(ParamKind::StringList, "modifiers", "Modifier keys");
        let value = serde_json::to_value(&desc).expect("serialize descriptor");
        assert_eq!(value["parameters"][0]["kind"], "string-list");
    }
}
