use crate::{
    error::Result,
    models::{GenerationRequest, Job, WebhookConfig},
};
use async_trait::async_trait;

/// Capability seam over the remote job API. Any system exposing
/// create/get/cancel-by-id semantics can stand behind it, which is also
/// what makes the adapter testable without a network.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Blocking submission; resolves once the remote job reaches a
    /// terminal state and carries its output.
    async fn create_sync(&self, request: &GenerationRequest) -> Result<Job>;

    /// Non-blocking submission; returns the initial job snapshot.
    async fn create_async(
        &self,
        request: &GenerationRequest,
        webhook: Option<&WebhookConfig>,
    ) -> Result<Job>;

    async fn get(&self, job_id: &str) -> Result<Job>;

    /// Advisory cancellation; returns whatever snapshot the remote
    /// reports afterwards.
    async fn cancel(&self, job_id: &str) -> Result<Job>;
}
