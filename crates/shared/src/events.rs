//! Quest generation stream events (Engine → client)
//!
//! Every event is one JSON object with a `type` discriminator and a
//! `content` payload. Scene events also carry their 1-based position.
//!
//! ## Ordering
//!
//! A successful session emits, in this order: `status`, `title`, `status`,
//! `description`, `status`, `characters`, `status`, `locations`, `status`,
//! `items`, `status`, one `scene` per scene, `complete`. A failed session
//! ends with a single `error` event instead.

use serde::{Deserialize, Serialize};

use screate_domain::{Character, Item, Location, Scene};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEvent {
    /// Human-readable progress note
    Status { content: String },
    Title { content: String },
    Description { content: String },
    Characters { content: Vec<Character> },
    Locations { content: Vec<Location> },
    Items { content: Vec<Item> },
    Scene {
        content: Scene,
        scene_number: usize,
        total_scenes: usize,
    },
    Complete { content: String },
    /// Terminal failure; nothing follows
    Error { content: String },

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl QuestEvent {
    pub fn status(content: impl Into<String>) -> Self {
        Self::Status {
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
        }
    }

    /// The wire `type` of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Title { .. } => "title",
            Self::Description { .. } => "description",
            Self::Characters { .. } => "characters",
            Self::Locations { .. } => "locations",
            Self::Items { .. } => "items",
            Self::Scene { .. } => "scene",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }

    /// True for the events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}
