//! Model status, health check and completion payloads.

use serde::{Deserialize, Serialize};

use crate::source::SourceError;

/// Backend health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, rename = "uptime")]
    pub uptime_secs: u64,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "operational")
    }
}

/// Load state of the presented model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Loaded,
    Loading,
    Unloaded,
    #[serde(other)]
    Unknown,
}

/// Model information reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub status: ModelStatus,
    #[serde(default)]
    pub context_window: u32,
    #[serde(default)]
    pub parameters: String,
}

impl ModelInfo {
    pub fn is_loaded(&self) -> bool {
        self.status == ModelStatus::Loaded
    }
}

/// Response to a model load request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Text completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a request with default sampling parameters.
    ///
    /// Empty or whitespace-only prompts are rejected before any I/O.
    pub fn new(prompt: impl Into<String>) -> Result<Self, SourceError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(SourceError::InvalidRequest("prompt must not be empty".to_string()));
        }
        Ok(Self {
            prompt,
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: 1024,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }
}

/// Generated completion text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub completion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_rejected() {
        assert!(matches!(
            CompletionRequest::new("   "),
            Err(SourceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn request_uses_default_sampling() {
        let request = CompletionRequest::new("fn main()").unwrap().with_temperature(5.0);
        assert_eq!(request.temperature, 2.0);
        assert_eq!(request.top_p, 0.95);
        assert_eq!(request.max_tokens, 1024);
    }

    #[test]
    fn unknown_model_status_decodes() {
        let info: ModelInfo =
            serde_json::from_str(r#"{"name": "june13525", "status": "warming"}"#).unwrap();
        assert_eq!(info.status, ModelStatus::Unknown);
        assert!(!info.is_loaded());
    }
}
