//! HTTP response bodies that are not quest data.

use serde::{Deserialize, Serialize};

/// Error classification code carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body was malformed
    BadRequest,
    /// Request data failed validation
    ValidationError,
    /// Route does not exist
    NotFound,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Body of `GET /api/health` and `POST /api/health/probe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub message: String,
    /// The text generator answered the last probe
    pub model_loaded: bool,
    /// `Ollama (<model>)` or `Fallback`
    pub ai_mode: String,
}

impl HealthResponse {
    pub fn new(version: impl Into<String>, model: &str, model_loaded: bool) -> Self {
        let version = version.into();
        let ai_mode = if model_loaded {
            format!("Ollama ({model})")
        } else {
            "Fallback".to_string()
        };
        Self {
            status: "healthy".to_string(),
            message: format!("SCreate Quest Generator API v{version} is running"),
            version,
            model_loaded,
            ai_mode,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
