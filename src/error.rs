use thiserror::Error;

#[derive(Debug, Error)]
pub enum RimagenError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Empty output: {0}")]
    EmptyOutput(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RimagenError {
    /// Stable kind tag, used when a response needs the error class
    /// separately from its message.
    pub fn kind(&self) -> &'static str {
        match self {
            RimagenError::Validation(_) => "validation",
            RimagenError::Remote(_) => "remote",
            RimagenError::NotFound(_) => "not_found",
            RimagenError::EmptyOutput(_) => "empty_output",
            RimagenError::Download(_) => "download",
            RimagenError::Config(_) => "config",
            RimagenError::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, RimagenError>;
