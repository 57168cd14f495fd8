//! Use cases - user story orchestration.
//!
//! Use cases coordinate ports and domain logic to fulfill one request.

use std::sync::Arc;
use std::time::Duration;

pub mod quest;

pub use quest::{GenerationCapability, QuestPipeline, QuestStreamer};

/// Container for the quest use cases.
pub struct QuestUseCases {
    pub pipeline: Arc<QuestPipeline>,
    pub streamer: QuestStreamer,
}

impl QuestUseCases {
    pub fn new(pipeline: Arc<QuestPipeline>, pacing: Duration) -> Self {
        let streamer = QuestStreamer::new(Arc::clone(&pipeline), pacing);
        Self { pipeline, streamer }
    }
}
