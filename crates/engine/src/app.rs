//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::infrastructure::{
    clock::SystemClock,
    ollama::OllamaClient,
    ports::{ClockPort, LlmPort},
    resilient_llm::{ResilientLlmClient, RetryConfig},
};
use crate::use_cases::{GenerationCapability, QuestPipeline, QuestUseCases};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub quests: QuestUseCases,
    pub capability: Arc<GenerationCapability>,
    /// Model name reported by the health endpoint
    pub model: String,
}

impl App {
    pub fn new(
        capability: Arc<GenerationCapability>,
        clock: Arc<dyn ClockPort>,
        model: impl Into<String>,
        pacing: Duration,
    ) -> Self {
        let pipeline = Arc::new(QuestPipeline::new(Arc::clone(&capability), clock));
        Self {
            quests: QuestUseCases::new(pipeline, pacing),
            capability,
            model: model.into(),
        }
    }

    /// Wire the production adapters described by `config`.
    ///
    /// The capability starts unavailable; call `probe` before serving.
    pub fn from_config(config: &EngineConfig) -> Self {
        let ollama = Arc::new(OllamaClient::new(
            &config.ollama_url,
            &config.ollama_model,
            config.llm_attempt_timeout(),
        ));
        let retry_config = RetryConfig {
            max_retries: config.llm_max_retries,
            ..RetryConfig::default()
        };
        tracing::info!(
            url = %config.ollama_url,
            model = %config.ollama_model,
            max_retries = retry_config.max_retries,
            timeout = ?config.llm_timeout,
            attempt_timeout = ?config.llm_attempt_timeout(),
            "LLM client configured"
        );
        let llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(ollama, retry_config));
        let capability = Arc::new(GenerationCapability::new(llm, config.llm_timeout));

        Self::new(
            capability,
            Arc::new(SystemClock::new()),
            config.ollama_model.clone(),
            config.stream_pacing,
        )
    }

    /// Re-check the text generator and return whether it is usable.
    pub async fn probe(&self) -> bool {
        self.capability.probe().await
    }
}
