pub mod image;
pub mod spec;

use serde_json::Value;

pub use image::{CancelJobTool, GenerateImageAsyncTool, GenerateImageTool, GetJobTool};
pub use spec::{ToolContext, ToolError, ToolResult, ToolSpec};

/// Advertisable description of one operation, for transport layers that
/// list their tools.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Declarative mapping from operation name to its contract and handler.
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolSpec>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: vec![
                Box::new(GenerateImageTool),
                Box::new(GenerateImageAsyncTool),
                Box::new(GetJobTool),
                Box::new(CancelJobTool),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn ToolSpec> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Catch-all dispatch boundary: whatever happens inside a handler, the
    /// transport layer receives a well-formed result and the process stays
    /// serviceable for the next call.
    pub async fn dispatch(&self, name: &str, input: Value, context: &ToolContext) -> ToolResult {
        let Some(tool) = self.get(name) else {
            log::warn!("Unknown tool '{}' requested", name);
            return ToolResult::error(format!("Unknown tool: {}", name));
        };

        log::debug!("Dispatching tool '{}'", name);
        match tool.execute(input, context).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Tool '{}' rejected the call: {}", name, e);
                ToolResult::error(e.to_string())
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
