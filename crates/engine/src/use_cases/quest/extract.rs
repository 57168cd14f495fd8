//! Tolerant JSON extraction from model output.
//!
//! Models wrap JSON in Markdown fences, prepend chatter ("Here are your
//! scenes:") or append notes. The extractor strips a fence that encloses the
//! whole reply, takes the first bracketed span and parses it strictly. Only
//! one candidate is tried.
//!
//! Fences inside the reply are left alone: a fenced block surrounded by prose
//! is still found by the span search, and backticks inside JSON strings
//! survive.

use regex_lite::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// ```json ... ``` or ``` ... ``` spanning the whole text; the tag is case-insensitive
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```(?i:json)?\s*(.*?)\s*```\z").expect("valid regex")
});

// Leftmost opener, greedy to the last closer of the same kind
static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\[.*\]|\{.*\})").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("model output is empty")]
    Empty,
    #[error("model output contains no parsable JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Pull the first JSON array or object out of arbitrary text.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Empty);
    }

    let cleaned = FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |inner| inner.as_str());

    let candidate = SPAN_RE
        .find(cleaned)
        .map_or(cleaned, |m| m.as_str());

    Ok(serde_json::from_str(candidate)?)
}
