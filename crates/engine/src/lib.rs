//! SCreate Engine library.
//!
//! Quest generation with a text-generation model and deterministic fallbacks,
//! served over HTTP and Server-Sent Events.
//!
//! ## Structure
//!
//! - `use_cases/` - The quest pipeline and streaming sessions
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and SSE entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;


pub use app::App;
pub use config::EngineConfig;
