//! Generation capability: text generation with an explicit availability flag.
//!
//! The flag is owned by this handle and only changes when `probe` runs (at
//! startup and on demand). While it is down, `generate` refuses immediately
//! so every stage falls back without waiting on the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is unavailable")]
    Unavailable,
    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

pub struct GenerationCapability {
    llm: Arc<dyn LlmPort>,
    available: AtomicBool,
    timeout: Duration,
}

impl GenerationCapability {
    /// Starts unavailable; call `probe` before serving.
    pub fn new(llm: Arc<dyn LlmPort>, timeout: Duration) -> Self {
        Self {
            llm,
            available: AtomicBool::new(false),
            timeout,
        }
    }

    /// Skip the initial probe and trust `available`.
    pub fn with_availability(llm: Arc<dyn LlmPort>, timeout: Duration, available: bool) -> Self {
        Self {
            llm,
            available: AtomicBool::new(available),
            timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Ask the model server whether it can serve, and remember the answer.
    pub async fn probe(&self) -> bool {
        let healthy = match tokio::time::timeout(self.timeout, self.llm.check_health()).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Generation health check failed");
                false
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Generation health check timed out");
                false
            }
        };

        let was = self.available.swap(healthy, Ordering::AcqRel);
        if was != healthy {
            tracing::info!(available = healthy, "Generation availability changed");
        }
        healthy
    }

    /// Generate text for a single prompt, bounded by the configured timeout.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if !self.is_available() {
            return Err(GenerationError::Unavailable);
        }

        let request = LlmRequest::from_prompt(prompt);
        match tokio::time::timeout(self.timeout, self.llm.generate(request)).await {
            Ok(result) => Ok(result?.content),
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }
}
