//! Retry wrapper for any `LlmPort`.
//!
//! Generation calls that fail with a retryable error are repeated with
//! exponential backoff and random jitter. Health checks are never retried: a
//! probe wants the server's current answer.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Upper bound on a single backoff, before jitter
    pub max_delay: Duration,
    /// Fraction of the delay added or removed at random, 0.0 to 1.0
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            jitter: 0.2,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry `retry` (1-based), without jitter.
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let spread = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        delay.mul_f64((1.0 + spread).max(0.0))
    }
}

pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut retry = 0;

        loop {
            let error = match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if retry > 0 {
                        tracing::info!(retries = retry, "LLM request recovered");
                    }
                    return Ok(response);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                tracing::warn!(error = %error, "LLM request failed, not retrying");
                return Err(error);
            }
            if retry >= self.config.max_retries {
                tracing::warn!(attempts = retry + 1, error = %error, "LLM request failed, retries exhausted");
                return Err(error);
            }

            retry += 1;
            let delay = self.config.jittered(self.config.backoff(retry));
            tracing::warn!(
                retry,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "LLM request failed, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn check_health(&self) -> Result<bool, LlmError> {
        self.inner.check_health().await
    }
}
