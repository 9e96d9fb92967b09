use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::request::GenerationRequest;

/// Normalized lifecycle of a remote generation job. The remote system is
/// the only writer; this crate only reads snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// A pointer to generated image data. The remote contract varies between
/// direct URLs and inline base64 payloads; both collapse to this variant
/// so the downloader consumes them uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageReference {
    Url(String),
    Bytes { name: String, data: Vec<u8> },
}

impl ImageReference {
    /// Identity of the source, always reportable even when a local save
    /// fails.
    pub fn source(&self) -> &str {
        match self {
            ImageReference::Url(url) => url,
            ImageReference::Bytes { name, .. } => name,
        }
    }
}

/// Snapshot of a remote job. Lives only for the duration of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub input: Option<GenerationRequest>,
    pub output: Vec<ImageReference>,
    pub error: Option<String>,
    pub logs: Option<String>,
}

impl Job {
    pub fn new(id: impl Into<String>, status: JobStatus) -> Self {
        Job {
            id: id.into(),
            status,
            created_at: None,
            started_at: None,
            completed_at: None,
            input: None,
            output: Vec::new(),
            error: None,
            logs: None,
        }
    }
}

/// Output of the blocking generation path: ordered references plus the
/// request they answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub request: GenerationRequest,
    pub images: Vec<ImageReference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let parsed: JobStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(parsed, JobStatus::Running);
    }

    #[test]
    fn test_reference_source_identity() {
        let url = ImageReference::Url("https://cdn.example/a.png".into());
        assert_eq!(url.source(), "https://cdn.example/a.png");

        let bytes = ImageReference::Bytes {
            name: "inline:0".into(),
            data: vec![1, 2, 3],
        };
        assert_eq!(bytes.source(), "inline:0");
    }
}
