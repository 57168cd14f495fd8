//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A count-style value fell outside its allowed range
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - A "custom" selector arrives without its free-text override
    ///
    /// # Example
    /// ```ignore
    /// if starting_point.trim().is_empty() {
    ///     return Err(DomainError::validation("starting point is required"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an out-of-range error for a bounded count
    pub fn out_of_range(field: &'static str, min: u32, max: u32, actual: u32) -> Self {
        Self::OutOfRange {
            field,
            min,
            max,
            actual,
        }
    }
}
