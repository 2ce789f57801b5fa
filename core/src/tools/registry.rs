//! Tool registry for managing available tools

use crate::error::Result;
use crate::llm::ToolDefinition;
use crate::tools::{Source, Tool, ToolCall, ToolResult};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Registry mapping tool names to tool instances
///
/// Tools are kept in registration order. Registering a second tool under an
/// existing name replaces the first one in place.
///
/// Citation sources live inside the tools, so a registry shared between
/// concurrent queries mixes their sources. Use one registry per in-flight
/// query when that matters.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool under its declared name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => {
                debug!(tool = %name, "replacing registered tool");
                self.tools[slot] = tool;
            }
            None => {
                debug!(tool = %name, "registering tool");
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// List tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions for the LLM, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Execute a tool call
    ///
    /// An unknown tool name yields an error result rather than `Err`, so the
    /// caller always has text to hand back to the model. Errors raised by the
    /// tool itself are returned as `Err`.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let Some(tool) = self.get(&call.name) else {
            debug!(tool = %call.name, "unknown tool requested");
            let message = format!("Tool '{}' not found", call.name);
            return Ok(ToolResult::error(call.id, message));
        };

        let start_time = Instant::now();
        let result = tool.execute(call).await?;
        let duration = start_time.elapsed().as_millis() as u64;

        Ok(result.with_duration(duration))
    }

    /// Sources recorded by every tool, concatenated in registration order
    pub fn last_sources(&self) -> Vec<Source> {
        self.tools
            .iter()
            .flat_map(|tool| tool.last_sources())
            .collect()
    }

    /// Clear the recorded sources of every tool
    pub fn reset_sources(&self) {
        for tool in &self.tools {
            tool.reset_sources();
        }
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
    use crate::error::ToolError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct EchoTool {
        name: &'static str,
        description: &'static str,
        sources: Mutex<Vec<Source>>,
    }

    impl EchoTool {
        fn new(name: &'static str) -> Self {
            Self::described(name, "Echo the input back")
        }

        fn described(name: &'static str, description: &'static str) -> Self {
            Self {
                name,
                description,
                sources: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn input_schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }

        async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
            let text: String = call.get_parameter("text")?;
            if text == "fail" {
                return Err(ToolError::ExecutionFailed {
                    name: self.name.to_string(),
                    message: "asked to fail".to_string(),
                }
                .into());
            }
            self.sources.lock().unwrap().push(Source {
                title: format!("{} - {}", self.name, text),
                url: None,
            });
            Ok(ToolResult::success(call.id, text))
        }

        fn last_sources(&self) -> Vec<Source> {
            self.sources.lock().unwrap().clone()
        }

        fn reset_sources(&self) {
            self.sources.lock().unwrap().clear();
        }
    }

    #[tokio::test]
    async fn test_register_and_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new("echo")));

        let result = registry
            .execute(ToolCall::new("call_1", "echo", json!({"text": "hello"})))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.tool_call_id, "call_1");
        assert_eq!(result.content, "hello");
        assert!(result.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_returns_text() {
        let registry = ToolRegistry::new();

        let result = registry
            .execute(ToolCall::new("call_1", "unknown_tool", json!({})))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.content, "Tool 'unknown_tool' not found");
        assert_eq!(result.tool_call_id, "call_1");
    }

    #[tokio::test]
    async fn test_tool_errors_are_returned_to_the_caller() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new("echo")));

        let err = registry
            .execute(ToolCall::new("call_1", "echo", json!({"text": "fail"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("asked to fail"));
    }

    #[test]
    fn test_definitions_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new("search_course_content")));
        registry.register(Box::new(EchoTool::new("get_course_outline")));

        let names: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect();

        assert_eq!(names, vec!["search_course_content", "get_course_outline"]);
        assert_eq!(registry.definitions()[0].input_schema["required"], json!(["text"]));
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::described("a", "first")));
        registry.register(Box::new(EchoTool::new("b")));
        registry.register(Box::new(EchoTool::described("a", "second")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_tools(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().description(), "second");
    }

    #[tokio::test]
    async fn test_sources_aggregate_and_reset() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new("first")));
        registry.register(Box::new(EchoTool::new("second")));

        registry
            .execute(ToolCall::new("2", "second", json!({"text": "y"})))
            .await
            .unwrap();
        registry
            .execute(ToolCall::new("1", "first", json!({"text": "x"})))
            .await
            .unwrap();

        let titles: Vec<String> = registry
            .last_sources()
            .into_iter()
            .map(|source| source.title)
            .collect();
        assert_eq!(titles, vec!["first - x", "second - y"]);

        registry.reset_sources();
        assert!(registry.last_sources().is_empty());
    }
}
