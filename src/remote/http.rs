use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::MinimaxConfig,
    error::{Result, RimagenError},
    models::{GenerationRequest, ImageReference, Job, JobStatus, WebhookConfig},
    remote::traits::JobBackend,
};
use async_trait::async_trait;

/// Model-scoped create endpoint; get/cancel are keyed by id alone.
const CREATE_PATH: &str = "/v1/models/minimax/image-01/predictions";
const PREDICTIONS_PATH: &str = "/v1/predictions";

/// `reqwest`-backed [`JobBackend`] speaking the prediction-style wire
/// protocol of the remote inference API.
pub struct HttpJobBackend {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpJobBackend {
    pub fn new(config: &MinimaxConfig) -> Result<Self> {
        let token = config
            .api_token
            .clone()
            .ok_or_else(|| RimagenError::Config("MiniMax API token is required".into()))?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url(),
            token,
        })
    }

    fn build_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", self.token).parse().unwrap(),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        headers
    }

    async fn parse_job(response: reqwest::Response) -> Result<Job> {
        let payload: PredictionPayload = response
            .json()
            .await
            .map_err(|e| RimagenError::Serialization(format!("malformed job payload: {}", e)))?;
        payload.into_job()
    }

    async fn error_from(response: reqwest::Response, job_id: Option<&str>) -> RimagenError {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = job_id {
                return RimagenError::NotFound(id.to_string());
            }
        }
        let body = response.text().await.unwrap_or_default();
        RimagenError::Remote(format!("remote returned status {}: {}", status, body))
    }
}

#[async_trait]
impl JobBackend for HttpJobBackend {
    async fn create_sync(&self, request: &GenerationRequest) -> Result<Job> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, CREATE_PATH))
            .headers(self.build_headers())
            .header("Prefer", "wait")
            .json(&build_request_body(request, None)?)
            .send()
            .await
            .map_err(|e| RimagenError::Remote(format!("submit failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, None).await);
        }
        Self::parse_job(response).await
    }

    async fn create_async(
        &self,
        request: &GenerationRequest,
        webhook: Option<&WebhookConfig>,
    ) -> Result<Job> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, CREATE_PATH))
            .headers(self.build_headers())
            .json(&build_request_body(request, webhook)?)
            .send()
            .await
            .map_err(|e| RimagenError::Remote(format!("submit failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, None).await);
        }
        Self::parse_job(response).await
    }

    async fn get(&self, job_id: &str) -> Result<Job> {
        let response = self
            .client
            .get(format!("{}{}/{}", self.base_url, PREDICTIONS_PATH, job_id))
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|e| RimagenError::Remote(format!("get failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, Some(job_id)).await);
        }
        Self::parse_job(response).await
    }

    async fn cancel(&self, job_id: &str) -> Result<Job> {
        let response = self
            .client
            .post(format!(
                "{}{}/{}/cancel",
                self.base_url, PREDICTIONS_PATH, job_id
            ))
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|e| RimagenError::Remote(format!("cancel failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, Some(job_id)).await);
        }
        Self::parse_job(response).await
    }
}

fn build_request_body(
    request: &GenerationRequest,
    webhook: Option<&WebhookConfig>,
) -> Result<Value> {
    let input = serde_json::to_value(request)
        .map_err(|e| RimagenError::Serialization(format!("request encode failed: {}", e)))?;

    let mut body = json!({ "input": input });
    if let Some(webhook) = webhook {
        body["webhook"] = json!(webhook.url);
        body["webhook_events_filter"] = json!(webhook
            .events
            .iter()
            .map(|event| event.as_str())
            .collect::<Vec<_>>());
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct PredictionPayload {
    id: String,
    status: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    input: Option<Value>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    logs: Option<String>,
}

impl PredictionPayload {
    fn into_job(self) -> Result<Job> {
        let output = match &self.output {
            Some(value) => normalize_output(value)?,
            None => Vec::new(),
        };

        Ok(Job {
            id: self.id,
            status: parse_status(&self.status),
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            // Echoed input may carry remote-side extras; a non-request
            // shape degrades to no echo rather than a hard failure.
            input: self
                .input
                .and_then(|value| serde_json::from_value::<GenerationRequest>(value).ok()),
            output,
            error: self.error,
            logs: self.logs,
        })
    }
}

fn parse_status(raw: &str) -> JobStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "starting" | "queued" => JobStatus::Queued,
        "processing" | "running" => JobStatus::Running,
        "succeeded" => JobStatus::Succeeded,
        "failed" => JobStatus::Failed,
        "canceled" | "cancelled" => JobStatus::Cancelled,
        other => {
            log::warn!("Unrecognized remote job status '{}', treating as queued", other);
            JobStatus::Queued
        }
    }
}

/// The remote contract has shipped three output shapes over time: a bare
/// URL string, an array of URL strings, and an array of inline base64
/// objects. All collapse to one ordered reference list here.
fn normalize_output(value: &Value) -> Result<Vec<ImageReference>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(url) => Ok(vec![ImageReference::Url(url.clone())]),
        Value::Array(items) => {
            let mut references = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                references.push(normalize_output_item(i, item)?);
            }
            Ok(references)
        }
        other => Err(RimagenError::Serialization(format!(
            "unexpected output shape: {}",
            other
        ))),
    }
}

fn normalize_output_item(index: usize, item: &Value) -> Result<ImageReference> {
    if let Some(url) = item.as_str() {
        return Ok(ImageReference::Url(url.to_string()));
    }
    if let Some(url) = item.get("url").and_then(Value::as_str) {
        return Ok(ImageReference::Url(url.to_string()));
    }
    if let Some(encoded) = item.get("b64_json").and_then(Value::as_str) {
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| {
                RimagenError::Serialization(format!("invalid base64 at output[{}]: {}", index, e))
            })?;
        return Ok(ImageReference::Bytes {
            name: format!("inline:{}", index),
            data,
        });
    }
    Err(RimagenError::Serialization(format!(
        "unrecognized output element at index {}",
        index
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, WebhookEvent};

    #[test]
    fn test_parse_status_mapping() {
        assert_eq!(parse_status("starting"), JobStatus::Queued);
        assert_eq!(parse_status("processing"), JobStatus::Running);
        assert_eq!(parse_status("succeeded"), JobStatus::Succeeded);
        assert_eq!(parse_status("failed"), JobStatus::Failed);
        assert_eq!(parse_status("canceled"), JobStatus::Cancelled);
        assert_eq!(parse_status("CANCELLED"), JobStatus::Cancelled);
        assert_eq!(parse_status("warming-up"), JobStatus::Queued);
    }

    #[test]
    fn test_normalize_single_url() {
        let refs = normalize_output(&json!("https://cdn.example/a.png")).unwrap();
        assert_eq!(refs, vec![ImageReference::Url("https://cdn.example/a.png".into())]);
    }

    #[test]
    fn test_normalize_url_array_preserves_order() {
        let refs =
            normalize_output(&json!(["https://cdn/1.png", "https://cdn/2.png"])).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].source(), "https://cdn/1.png");
        assert_eq!(refs[1].source(), "https://cdn/2.png");
    }

    #[test]
    fn test_normalize_base64_objects() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let refs = normalize_output(&json!([{ "b64_json": encoded }])).unwrap();
        match &refs[0] {
            ImageReference::Bytes { name, data } => {
                assert_eq!(name, "inline:0");
                assert_eq!(data, &vec![1, 2, 3]);
            }
            other => panic!("expected bytes reference, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_shapes() {
        assert!(normalize_output(&json!(42)).is_err());
        assert!(normalize_output(&json!([{ "weird": true }])).is_err());
        let invalid = normalize_output(&json!([{ "b64_json": "###" }]));
        assert!(matches!(invalid, Err(RimagenError::Serialization(_))));
    }

    #[test]
    fn test_payload_into_job_echoes_input() {
        let payload: PredictionPayload = serde_json::from_value(json!({
            "id": "job-7",
            "status": "succeeded",
            "created_at": "2026-08-27T10:00:00Z",
            "input": {
                "prompt": "a fox",
                "aspect_ratio": "16:9",
                "number_of_images": 2,
                "prompt_optimizer": false
            },
            "output": ["https://cdn/1.png", "https://cdn/2.png"],
            "logs": "step 1\nstep 2"
        }))
        .unwrap();

        let job = payload.into_job().unwrap();
        assert_eq!(job.id, "job-7");
        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.output.len(), 2);
        let input = job.input.unwrap();
        assert_eq!(input.prompt, "a fox");
        assert_eq!(input.aspect_ratio, AspectRatio::Wide);
        assert_eq!(input.number_of_images, 2);
        assert!(!input.prompt_optimizer);
        assert_eq!(job.logs.as_deref(), Some("step 1\nstep 2"));
    }

    #[test]
    fn test_request_body_webhook_passthrough() {
        let request = GenerationRequest::new("a fox");
        let body = build_request_body(&request, None).unwrap();
        assert!(body.get("webhook").is_none());
        assert_eq!(body["input"]["prompt"], "a fox");

        let webhook = WebhookConfig::new("https://hooks.example/done")
            .with_events(vec![WebhookEvent::Start, WebhookEvent::Completed]);
        let body = build_request_body(&request, Some(&webhook)).unwrap();
        assert_eq!(body["webhook"], "https://hooks.example/done");
        assert_eq!(body["webhook_events_filter"], json!(["start", "completed"]));
    }

    #[test]
    fn test_backend_requires_token() {
        let config = MinimaxConfig::new();
        assert!(matches!(
            HttpJobBackend::new(&config),
            Err(RimagenError::Config(_))
        ));
    }
}
