// Tool trait, registry and the dispatch safety net

use crate::protocol::{ToolDefinition, ToolResponse};
use anyhow::Result;
use futures_util::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Definition advertised by `tools/list`
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments.
    ///
    /// Argument violations are reported as `Ok` failures; `Err` is reserved
    /// for remote or local faults.
    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse>;
}

/// Tool registry for managing available tools.
///
/// Registration order is the order tools are listed in.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    definitions: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            definitions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let definition = tool.definition();
        match self.index.get(&definition.name) {
            Some(&position) => {
                self.tools[position] = tool;
                self.definitions[position] = definition;
            }
            None => {
                self.index.insert(definition.name.clone(), self.tools.len());
                self.tools.push(tool);
                self.definitions.push(definition);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&position| self.tools[position].clone())
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All tool definitions, in registration order
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool by name. Never fails: unknown names, handler errors and
    /// panics all come back as `{success: false, error}`.
    pub async fn dispatch(&self, name: &str, arguments: Map<String, Value>) -> ToolResponse {
        let tool = match self.get(name) {
            Some(tool) => tool,
            None => return ToolResponse::failure(format!("Unknown tool: {}", name)),
        };

        debug!(tool = name, "Dispatching tool call");

        match AssertUnwindSafe(tool.execute(arguments)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                let message = format!("{e:#}");
                error!(tool = name, error = %message, "Tool execution failed");
                ToolResponse::failure(message)
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(tool = name, panic = %message, "Tool execution panicked");
                ToolResponse::failure(message)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool execution panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ParamType;
    use anyhow::anyhow;
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echo the arguments back").param(
                "text",
                ParamType::String,
                "Text to echo",
            )
        }

        async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
            Ok(ToolResponse::success(Value::Object(arguments)))
        }
    }

    struct FailingTool;

    #[async_trait::async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("fail", "Always fails")
        }

        async fn execute(&self, _arguments: Map<String, Value>) -> Result<ToolResponse> {
            Err(anyhow!("connection refused").context("Failed to fetch job"))
        }
    }

    struct PanickingTool;

    #[async_trait::async_trait]
    impl Tool for PanickingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("panic", "Always panics")
        }

        async fn execute(&self, _arguments: Map<String, Value>) -> Result<ToolResponse> {
            panic!("index out of range")
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(FailingTool));
        registry.register(Arc::new(PanickingTool));
        registry
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let registry = registry();
        let names: Vec<_> = registry.definitions().iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["echo", "fail", "panic"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("echo"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.definitions()[0].name, "echo");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let response = registry().dispatch("nope", Map::new()).await;
        assert_eq!(response, ToolResponse::failure("Unknown tool: nope"));
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mut arguments = Map::new();
        arguments.insert("text".to_string(), json!("hi"));

        let response = registry().dispatch("echo", arguments).await;
        assert_eq!(response, ToolResponse::success(json!({"text": "hi"})));
    }

    #[tokio::test]
    async fn test_dispatch_converts_errors() {
        let response = registry().dispatch("fail", Map::new()).await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Failed to fetch job: connection refused")
        );
    }

    #[tokio::test]
    async fn test_dispatch_catches_panics() {
        let response = registry().dispatch("panic", Map::new()).await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("index out of range"));
    }
}
