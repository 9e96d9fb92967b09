use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    error::RimagenError,
    format::{format_failure, format_generation, format_job, format_submission},
    models::{
        AspectRatio, GenerationRequest, JobStatus, WebhookConfig, WebhookEvent, MAX_IMAGE_COUNT,
        MIN_IMAGE_COUNT,
    },
    tools::spec::{optional_bool, optional_str, required_str, ToolContext, ToolError, ToolResult,
        ToolSpec},
};

fn parse_request(input: &Value) -> Result<GenerationRequest, ToolError> {
    let prompt = required_str(input, "prompt")?;
    let mut request = GenerationRequest::new(prompt);

    if let Some(raw) = optional_str(input, "aspect_ratio") {
        let ratio = AspectRatio::parse(raw).ok_or_else(|| {
            ToolError::invalid_input(format!(
                "unsupported aspect_ratio '{}'; expected one of: {}",
                raw,
                AspectRatio::all()
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        request = request.with_aspect_ratio(ratio);
    }

    if let Some(value) = input.get("number_of_images") {
        let count = value.as_u64().ok_or_else(|| {
            ToolError::invalid_input("number_of_images must be a positive integer")
        })?;
        request = request.with_image_count(u32::try_from(count).unwrap_or(u32::MAX));
    }

    if let Some(flag) = optional_bool(input, "prompt_optimizer") {
        request = request.with_prompt_optimizer(flag);
    }
    if let Some(uri) = optional_str(input, "subject_reference") {
        request = request.with_subject_reference(uri);
    }

    Ok(request)
}

fn parse_webhook(input: &Value) -> Result<Option<WebhookConfig>, ToolError> {
    let Some(url) = optional_str(input, "webhook") else {
        if input.get("webhook_events_filter").is_some() {
            log::warn!("webhook_events_filter provided without a webhook url, ignoring");
        }
        return Ok(None);
    };

    let mut config = WebhookConfig::new(url);
    if let Some(raw_events) = input.get("webhook_events_filter") {
        let items = raw_events.as_array().ok_or_else(|| {
            ToolError::invalid_input("webhook_events_filter must be an array of event names")
        })?;
        let mut events = Vec::with_capacity(items.len());
        for item in items {
            let name = item.as_str().ok_or_else(|| {
                ToolError::invalid_input("webhook_events_filter entries must be strings")
            })?;
            let event = WebhookEvent::parse(name).ok_or_else(|| {
                ToolError::invalid_input(format!(
                    "unknown webhook event '{}'; expected start, output, logs or completed",
                    name
                ))
            })?;
            events.push(event);
        }
        config = config.with_events(events);
    }
    Ok(Some(config))
}

fn generation_properties() -> Value {
    json!({
        "prompt": {
            "type": "string",
            "description": "Text prompt describing the image to generate"
        },
        "aspect_ratio": {
            "type": "string",
            "description": "Aspect ratio of the generated image (default: 1:1)",
            "enum": AspectRatio::all().iter().map(|r| r.as_str()).collect::<Vec<_>>()
        },
        "number_of_images": {
            "type": "integer",
            "description": "How many images to generate",
            "minimum": MIN_IMAGE_COUNT,
            "maximum": MAX_IMAGE_COUNT,
            "default": 1
        },
        "prompt_optimizer": {
            "type": "boolean",
            "description": "Let the model rewrite the prompt for better results",
            "default": true
        },
        "subject_reference": {
            "type": "string",
            "description": "Optional URI of a subject reference image"
        }
    })
}

// === Synchronous generation ===

/// Blocking generation: submits, waits for output, saves every image
/// locally and reports paths alongside the source references.
pub struct GenerateImageTool;

#[async_trait]
impl ToolSpec for GenerateImageTool {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn description(&self) -> &'static str {
        "Generate images from a text prompt and save them locally. Blocks until the remote job finishes."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": generation_properties(),
            "required": ["prompt"]
        })
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let request = parse_request(&input)?;

        match context.client.generate_sync(&request).await {
            Ok(result) => {
                let assets = context
                    .downloader
                    .materialize_all(&result.request.prompt, &result.images, &context.output_dir)
                    .await;
                Ok(ToolResult::success(format_generation(
                    &result.request,
                    &assets,
                )))
            }
            Err(RimagenError::Validation(message)) => Err(ToolError::invalid_input(message)),
            Err(e) => Ok(ToolResult::error(format_failure(&e))),
        }
    }
}

// === Asynchronous generation ===

/// Tracked generation: submits and returns the job id immediately.
pub struct GenerateImageAsyncTool;

#[async_trait]
impl ToolSpec for GenerateImageAsyncTool {
    fn name(&self) -> &'static str {
        "generate_async"
    }

    fn description(&self) -> &'static str {
        "Submit an image generation job and return its id without waiting. Poll with get_job; optional webhook notifications."
    }

    fn input_schema(&self) -> Value {
        let mut properties = generation_properties();
        properties["webhook"] = json!({
            "type": "string",
            "description": "URL the remote system calls on job lifecycle events"
        });
        properties["webhook_events_filter"] = json!({
            "type": "array",
            "description": "Which events trigger the webhook (default: completed)",
            "items": {
                "type": "string",
                "enum": ["start", "output", "logs", "completed"]
            }
        });
        json!({
            "type": "object",
            "properties": properties,
            "required": ["prompt"]
        })
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let request = parse_request(&input)?;
        let webhook = parse_webhook(&input)?;

        match context
            .client
            .generate_async(&request, webhook.as_ref())
            .await
        {
            Ok(job) => Ok(ToolResult::success(format_submission(&job))),
            Err(RimagenError::Validation(message)) => Err(ToolError::invalid_input(message)),
            Err(e) => Ok(ToolResult::error(format_failure(&e))),
        }
    }
}

// === Job polling ===

/// Poll a job by id; when it has succeeded, its images are saved locally
/// as part of the same call.
pub struct GetJobTool;

#[async_trait]
impl ToolSpec for GetJobTool {
    fn name(&self) -> &'static str {
        "get_job"
    }

    fn description(&self) -> &'static str {
        "Fetch the current status of a generation job. Downloads the images when the job has succeeded."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": {
                    "type": "string",
                    "description": "Job id returned by generate_async"
                }
            },
            "required": ["job_id"]
        })
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let job_id = required_str(&input, "job_id")?;

        match context.client.get_job(job_id).await {
            Ok(job) => {
                if job.status == JobStatus::Succeeded && !job.output.is_empty() {
                    let prompt = job
                        .input
                        .as_ref()
                        .map(|request| request.prompt.as_str())
                        .unwrap_or_default();
                    let assets = context
                        .downloader
                        .materialize_all(prompt, &job.output, &context.output_dir)
                        .await;
                    Ok(ToolResult::success(format_job(&job, Some(&assets))))
                } else {
                    Ok(ToolResult::success(format_job(&job, None)))
                }
            }
            Err(RimagenError::Validation(message)) => Err(ToolError::invalid_input(message)),
            Err(e) => Ok(ToolResult::error(format_failure(&e))),
        }
    }
}

// === Job cancellation ===

/// Advisory cancellation; reports whatever status the remote system
/// settles on.
pub struct CancelJobTool;

#[async_trait]
impl ToolSpec for CancelJobTool {
    fn name(&self) -> &'static str {
        "cancel_job"
    }

    fn description(&self) -> &'static str {
        "Request cancellation of a generation job and return the resulting status snapshot."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": {
                    "type": "string",
                    "description": "Job id returned by generate_async"
                }
            },
            "required": ["job_id"]
        })
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let job_id = required_str(&input, "job_id")?;

        match context.client.cancel_job(job_id).await {
            Ok(job) => Ok(ToolResult::success(format_job(&job, None))),
            Err(RimagenError::Validation(message)) => Err(ToolError::invalid_input(message)),
            Err(e) => Ok(ToolResult::error(format_failure(&e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        assert_eq!(GenerateImageTool.name(), "generate");
        assert_eq!(GenerateImageAsyncTool.name(), "generate_async");
        assert_eq!(GetJobTool.name(), "get_job");
        assert_eq!(CancelJobTool.name(), "cancel_job");
    }

    #[test]
    fn test_generate_schema_requires_prompt() {
        let schema = GenerateImageTool.input_schema();
        let required = schema.get("required").unwrap().as_array().unwrap();
        assert!(required.iter().any(|v| v.as_str() == Some("prompt")));
        let ratios = schema["properties"]["aspect_ratio"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(ratios.len(), 8);
    }

    #[test]
    fn test_async_schema_adds_webhook_fields() {
        let schema = GenerateImageAsyncTool.input_schema();
        assert!(schema["properties"].get("webhook").is_some());
        assert!(schema["properties"].get("webhook_events_filter").is_some());
    }

    #[test]
    fn test_parse_request_full() {
        let input = json!({
            "prompt": "a fox",
            "aspect_ratio": "9:16",
            "number_of_images": 4,
            "prompt_optimizer": false,
            "subject_reference": "https://example.com/s.png"
        });
        let request = parse_request(&input).unwrap();
        assert_eq!(request.aspect_ratio, AspectRatio::Tall);
        assert_eq!(request.number_of_images, 4);
        assert!(!request.prompt_optimizer);
        assert_eq!(
            request.subject_reference.as_deref(),
            Some("https://example.com/s.png")
        );
    }

    #[test]
    fn test_parse_request_rejects_bad_ratio() {
        let input = json!({ "prompt": "a fox", "aspect_ratio": "5:4" });
        let err = parse_request(&input).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_request_rejects_non_integer_count() {
        let input = json!({ "prompt": "a fox", "number_of_images": "three" });
        assert!(parse_request(&input).is_err());
        let input = json!({ "prompt": "a fox", "number_of_images": -1 });
        assert!(parse_request(&input).is_err());
    }

    #[test]
    fn test_parse_webhook_events() {
        let input = json!({
            "webhook": "https://hooks.example/x",
            "webhook_events_filter": ["start", "completed"]
        });
        let webhook = parse_webhook(&input).unwrap().unwrap();
        assert_eq!(
            webhook.events,
            vec![WebhookEvent::Start, WebhookEvent::Completed]
        );

        let input = json!({ "webhook_events_filter": ["completed"] });
        assert!(parse_webhook(&input).unwrap().is_none());

        let input = json!({
            "webhook": "https://hooks.example/x",
            "webhook_events_filter": ["finished"]
        });
        assert!(parse_webhook(&input).is_err());
    }
}
