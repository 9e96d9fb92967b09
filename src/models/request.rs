use serde::{Deserialize, Serialize};

use crate::error::{Result, RimagenError};

pub const MIN_IMAGE_COUNT: u32 = 1;
pub const MAX_IMAGE_COUNT: u32 = 9;

/// The fixed set of aspect ratios the remote model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:2")]
    Classic,
    #[serde(rename = "2:3")]
    ClassicPortrait,
    #[serde(rename = "3:4")]
    StandardPortrait,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "21:9")]
    Ultrawide,
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Square
    }
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Classic => "3:2",
            AspectRatio::ClassicPortrait => "2:3",
            AspectRatio::StandardPortrait => "3:4",
            AspectRatio::Tall => "9:16",
            AspectRatio::Ultrawide => "21:9",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1:1" => Some(AspectRatio::Square),
            "16:9" => Some(AspectRatio::Wide),
            "4:3" => Some(AspectRatio::Standard),
            "3:2" => Some(AspectRatio::Classic),
            "2:3" => Some(AspectRatio::ClassicPortrait),
            "3:4" => Some(AspectRatio::StandardPortrait),
            "9:16" => Some(AspectRatio::Tall),
            "21:9" => Some(AspectRatio::Ultrawide),
            _ => None,
        }
    }

    pub fn all() -> [AspectRatio; 8] {
        [
            AspectRatio::Square,
            AspectRatio::Wide,
            AspectRatio::Standard,
            AspectRatio::Classic,
            AspectRatio::ClassicPortrait,
            AspectRatio::StandardPortrait,
            AspectRatio::Tall,
            AspectRatio::Ultrawide,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_image_count")]
    pub number_of_images: u32,
    #[serde(default = "default_prompt_optimizer")]
    pub prompt_optimizer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_reference: Option<String>,
}

fn default_image_count() -> u32 {
    1
}

fn default_prompt_optimizer() -> bool {
    true
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            number_of_images: default_image_count(),
            prompt_optimizer: default_prompt_optimizer(),
            subject_reference: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_image_count(mut self, count: u32) -> Self {
        self.number_of_images = count;
        self
    }

    pub fn with_prompt_optimizer(mut self, enabled: bool) -> Self {
        self.prompt_optimizer = enabled;
        self
    }

    pub fn with_subject_reference(mut self, uri: impl Into<String>) -> Self {
        self.subject_reference = Some(uri.into());
        self
    }

    /// Checked before any remote call; contract violations never leave
    /// the process.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(RimagenError::Validation("prompt must not be empty".into()));
        }
        if self.number_of_images < MIN_IMAGE_COUNT || self.number_of_images > MAX_IMAGE_COUNT {
            return Err(RimagenError::Validation(format!(
                "number_of_images must be between {} and {}, got {}",
                MIN_IMAGE_COUNT, MAX_IMAGE_COUNT, self.number_of_images
            )));
        }
        Ok(())
    }
}

/// Lifecycle events the remote system can report to a caller-supplied
/// webhook. Only meaningful alongside a webhook URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookEvent {
    Start,
    Output,
    Logs,
    Completed,
}

impl WebhookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::Start => "start",
            WebhookEvent::Output => "output",
            WebhookEvent::Logs => "logs",
            WebhookEvent::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "start" => Some(WebhookEvent::Start),
            "output" => Some(WebhookEvent::Output),
            "logs" => Some(WebhookEvent::Logs),
            "completed" => Some(WebhookEvent::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    pub events: Vec<WebhookEvent>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        WebhookConfig {
            url: url.into(),
            events: vec![WebhookEvent::Completed],
        }
    }

    pub fn with_events(mut self, events: Vec<WebhookEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(RimagenError::Validation(
                "webhook url must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_roundtrip() {
        for ratio in AspectRatio::all() {
            assert_eq!(AspectRatio::parse(ratio.as_str()), Some(ratio));
        }
        assert_eq!(AspectRatio::parse("7:5"), None);
        assert_eq!(AspectRatio::all().len(), 8);
    }

    #[test]
    fn test_aspect_ratio_serde_rename() {
        let json = serde_json::to_string(&AspectRatio::Wide).unwrap();
        assert_eq!(json, "\"16:9\"");
        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::Tall);
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("a lighthouse");
        assert_eq!(request.aspect_ratio, AspectRatio::Square);
        assert_eq!(request.number_of_images, 1);
        assert!(request.prompt_optimizer);
        assert!(request.subject_reference.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_count_bounds() {
        for count in [0, 10, 100] {
            let request = GenerationRequest::new("x").with_image_count(count);
            assert!(matches!(
                request.validate(),
                Err(crate::error::RimagenError::Validation(_))
            ));
        }
        for count in 1..=9 {
            let request = GenerationRequest::new("x").with_image_count(count);
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let request = GenerationRequest::new("   ");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_webhook_defaults_to_completed() {
        let webhook = WebhookConfig::new("https://example.com/hook");
        assert_eq!(webhook.events, vec![WebhookEvent::Completed]);
        assert!(webhook.validate().is_ok());
        assert!(WebhookConfig::new("  ").validate().is_err());
    }

    #[test]
    fn test_webhook_event_parse() {
        assert_eq!(WebhookEvent::parse("logs"), Some(WebhookEvent::Logs));
        assert_eq!(WebhookEvent::parse("finished"), None);
    }
}
