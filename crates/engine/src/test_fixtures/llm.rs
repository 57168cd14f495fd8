//! Hand-written LLM fakes for pipeline and session tests.
//!
//! `MockLlmPort` covers single-call expectations; these fakes cover whole
//! sessions where the order of replies matters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::llm::ScriptedLlm;
//!
//! let llm = ScriptedLlm::new(vec!["A storm gathers.", "[]"]);
//! let prompts = llm.prompts();
//! // ... run stages, then inspect `prompts`
//! ```

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::{ClockPort, LlmError, LlmPort, LlmRequest, LlmResponse};

/// Unix time used by every fixed-clock test.
pub const FIXED_TIMESTAMP: i64 = 1_700_000_000;

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    let now = Utc
        .timestamp_opt(FIXED_TIMESTAMP, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(FixedClock(now))
}

/// Replies with canned texts in order, then fails every further call.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every prompt received so far, shared with the caller.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.prompts.lock().expect("prompts lock").push(request.prompt);

        match self.replies.lock().expect("replies lock").pop_front() {
            Some(reply) => Ok(LlmResponse::text(reply)),
            None => Err(LlmError::RequestFailed("script exhausted".to_string())),
        }
    }

    async fn check_health(&self) -> Result<bool, LlmError> {
        Ok(true)
    }
}

/// Never answers.
pub struct StallingLlm;

#[async_trait]
impl LlmPort for StallingLlm {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(LlmError::RequestFailed("unreachable".to_string()))
    }

    async fn check_health(&self) -> Result<bool, LlmError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(true)
    }
}

/// Panics on the first generation call.
pub struct PanickingLlm;

#[async_trait]
impl LlmPort for PanickingLlm {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
        panic!("model adapter crashed");
    }

    async fn check_health(&self) -> Result<bool, LlmError> {
        Ok(true)
    }
}

/// Counts calls and answers each one after `delay`.
pub struct SlowLlm {
    pub delay: Duration,
    pub calls: Arc<std::sync::atomic::AtomicUsize>,
}

#[async_trait]
impl LlmPort for SlowLlm {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(LlmResponse::text("[]"))
    }

    async fn check_health(&self) -> Result<bool, LlmError> {
        Ok(true)
    }
}
