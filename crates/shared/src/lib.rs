//! SCreate Protocol - wire types shared by the engine and its clients
//!
//! - Quest generation request body
//! - Stream events (one JSON object per SSE `data:` line)
//! - Health and error bodies
//!
//! No business logic lives here; validation is delegated to the domain crate.

pub mod events;
pub mod request;
pub mod responses;

pub use events::QuestEvent;
pub use request::QuestRequest;
pub use responses::{ErrorBody, ErrorCode, HealthResponse, ServiceInfo};
