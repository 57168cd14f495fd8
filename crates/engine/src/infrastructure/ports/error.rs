//! Port error types.

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("LLM server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("LLM service unavailable: {0}")]
    Unavailable(String),
}

impl LlmError {
    /// Whether the same request may succeed if sent again.
    ///
    /// Client errors (4xx) repeat deterministically and an unreachable server
    /// is the fallback path's job, so neither is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => !(400..500).contains(status),
            Self::RequestFailed(_) | Self::InvalidResponse(_) => true,
            Self::Unavailable(_) => false,
        }
    }
}
