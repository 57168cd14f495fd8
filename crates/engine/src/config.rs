//! Engine configuration from environment variables.
//!
//! `.env.local` and `.env` at the repository root are loaded first (see
//! `main`), so everything here can also come from those files.

use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LLM_MAX_RETRIES: u32 = 2;
const DEFAULT_STREAM_PACING_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ollama_url: String,
    pub ollama_model: String,
    pub server_host: String,
    pub server_port: u16,
    /// Bound on one generation call, retries included
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    /// Delay between stream events
    pub stream_pacing: Duration,
    /// Comma-separated origins, or `*`
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            llm_max_retries: DEFAULT_LLM_MAX_RETRIES,
            stream_pacing: Duration::from_millis(DEFAULT_STREAM_PACING_MS),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    /// HTTP timeout for one attempt, so every retry fits inside `llm_timeout`.
    pub fn llm_attempt_timeout(&self) -> Duration {
        self.llm_timeout / self.llm_max_retries.saturating_add(1)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            ollama_url: get("OLLAMA_URL")
                .or_else(|| get("OLLAMA_BASE_URL"))
                .unwrap_or(defaults.ollama_url),
            ollama_model: get("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(
                "SERVER_PORT",
                get("SERVER_PORT").or_else(|| get("PORT")),
                defaults.server_port,
            ),
            llm_timeout: Duration::from_secs(parse_or(
                "LLM_TIMEOUT_SECS",
                get("LLM_TIMEOUT_SECS"),
                DEFAULT_LLM_TIMEOUT_SECS,
            )),
            llm_max_retries: parse_or(
                "LLM_MAX_RETRIES",
                get("LLM_MAX_RETRIES"),
                defaults.llm_max_retries,
            ),
            stream_pacing: Duration::from_millis(parse_or(
                "STREAM_PACING_MS",
                get("STREAM_PACING_MS"),
                DEFAULT_STREAM_PACING_MS,
            )),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "Invalid configuration value, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        assert_eq!(config(&[]), EngineConfig::default());
    }

    #[test]
    fn test_primary_keys_win_over_aliases() {
        let config = config(&[
            ("OLLAMA_URL", "http://gpu-box:11434"),
            ("OLLAMA_BASE_URL", "http://ignored:11434"),
            ("PORT", "9000"),
        ]);

        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_attempt_timeout_leaves_room_for_retries() {
        let config = config(&[("LLM_TIMEOUT_SECS", "90"), ("LLM_MAX_RETRIES", "2")]);

        assert_eq!(config.llm_attempt_timeout(), Duration::from_secs(30));
        assert!(config.llm_attempt_timeout() * 3 <= config.llm_timeout);
    }

    #[test]
    fn test_no_retries_gives_the_whole_budget_to_one_attempt() {
        let config = config(&[("LLM_MAX_RETRIES", "0")]);

        assert_eq!(config.llm_attempt_timeout(), config.llm_timeout);
    }

    #[test]
    fn test_numeric_values_and_invalid_fallbacks() {
        let config = config(&[
            ("LLM_TIMEOUT_SECS", "30"),
            ("STREAM_PACING_MS", "0"),
            ("LLM_MAX_RETRIES", "many"),
            ("CORS_ALLOWED_ORIGINS", "  "),
        ]);

        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.stream_pacing, Duration::ZERO);
        assert_eq!(config.llm_max_retries, DEFAULT_LLM_MAX_RETRIES);
        assert_eq!(config.cors_allowed_origins, None);
    }
}
