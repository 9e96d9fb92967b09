use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::{download::AssetDownloader, remote::ImageJobClient};

/// Per-process context handed to every tool invocation. Holds only
/// read-only configuration and stateless handles, so the transport may
/// dispatch invocations concurrently.
#[derive(Clone)]
pub struct ToolContext {
    pub client: ImageJobClient,
    pub downloader: AssetDownloader,
    pub output_dir: PathBuf,
}

impl ToolContext {
    pub fn new(client: ImageJobClient, output_dir: impl Into<PathBuf>) -> Self {
        ToolContext {
            client,
            downloader: AssetDownloader::new(),
            output_dir: output_dir.into(),
        }
    }
}

/// Uniform response envelope returned to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub text: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        ToolResult {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ToolResult {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Structured tool failure, kept distinct from remote and IO failures.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ToolError::InvalidInput(message.into())
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed(message.into())
    }
}

/// A callable operation: name, human description, JSON-schema input
/// contract, and the handler itself.
#[async_trait]
pub trait ToolSpec: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn input_schema(&self) -> Value;

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;
}

pub fn required_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ToolError::invalid_input(format!("missing required field '{}'", field)))
}

pub fn optional_str<'a>(input: &'a Value, field: &str) -> Option<&'a str> {
    input.get(field).and_then(Value::as_str)
}

pub fn optional_bool(input: &Value, field: &str) -> Option<bool> {
    input.get(field).and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let input = json!({ "prompt": "a fox", "empty": "  " });
        assert_eq!(required_str(&input, "prompt").unwrap(), "a fox");
        assert!(required_str(&input, "missing").is_err());
        assert!(required_str(&input, "empty").is_err());
    }

    #[test]
    fn test_optional_helpers() {
        let input = json!({ "flag": true, "name": "x", "number": 3 });
        assert_eq!(optional_bool(&input, "flag"), Some(true));
        assert_eq!(optional_bool(&input, "name"), None);
        assert_eq!(optional_str(&input, "name"), Some("x"));
        assert_eq!(optional_str(&input, "number"), None);
    }
}
