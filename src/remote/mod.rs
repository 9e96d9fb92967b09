pub mod http;
pub mod traits;

use std::sync::Arc;

use crate::{
    config::Config,
    error::{Result, RimagenError},
    models::{GenerationRequest, GenerationResult, Job, WebhookConfig},
};

pub use http::HttpJobBackend;
pub use traits::JobBackend;

/// Adapter over the remote job API. Stateless apart from the backend
/// handle; safe to share across concurrent tool invocations. No retry or
/// backoff lives here: a transient remote failure surfaces immediately
/// and re-invoking the tool is the caller's retry, so a repeated blocking
/// submit can create duplicate billable work.
#[derive(Clone)]
pub struct ImageJobClient {
    backend: Arc<dyn JobBackend>,
}

impl ImageJobClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            backend: Arc::new(HttpJobBackend::new(&config.minimax)?),
        })
    }

    /// Build the client over a custom backend, used for alternate remotes
    /// and for tests.
    pub fn with_backend(backend: Arc<dyn JobBackend>) -> Self {
        Self { backend }
    }

    /// Blocking generation. Fails with `EmptyOutput` when the remote
    /// nominally succeeds but returns zero references; the contract
    /// promises at least one image but is not trusted on it.
    pub async fn generate_sync(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        log::info!(
            "Submitting blocking generation for {} image(s)",
            request.number_of_images
        );
        let job = self.backend.create_sync(request).await?;

        if job.output.is_empty() {
            return Err(RimagenError::EmptyOutput(format!(
                "job {} finished with no images",
                job.id
            )));
        }

        log::info!(
            "Job {} produced {} image reference(s)",
            job.id,
            job.output.len()
        );
        Ok(GenerationResult {
            request: request.clone(),
            images: job.output,
        })
    }

    /// Non-blocking submission. Returns the initial snapshot; never
    /// downloads anything because nothing exists to download yet.
    pub async fn generate_async(
        &self,
        request: &GenerationRequest,
        webhook: Option<&WebhookConfig>,
    ) -> Result<Job> {
        request.validate()?;
        if let Some(webhook) = webhook {
            webhook.validate()?;
        }

        let job = self.backend.create_async(request, webhook).await?;
        log::info!(
            "Job {} accepted with status {}",
            job.id,
            job.status.as_str()
        );
        Ok(job)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let job_id = validate_job_id(job_id)?;
        self.backend.get(job_id).await
    }

    pub async fn cancel_job(&self, job_id: &str) -> Result<Job> {
        let job_id = validate_job_id(job_id)?;
        log::info!("Requesting cancellation of job {}", job_id);
        self.backend.cancel(job_id).await
    }
}

fn validate_job_id(job_id: &str) -> Result<&str> {
    let trimmed = job_id.trim();
    if trimmed.is_empty() {
        return Err(RimagenError::Validation("job id must not be empty".into()));
    }
    Ok(trimmed)
}
