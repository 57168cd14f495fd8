//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - LLM calls (could swap Ollama -> another OpenAI-compatible server)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{FinishReason, LlmPort, LlmRequest, LlmResponse, TokenUsage};

#[cfg(test)]
pub use external::MockLlmPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::LlmError;
