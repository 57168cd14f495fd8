//! SCreate Domain - quest entities and scene graph rules.
//!
//! Pure data and pure functions: no I/O, no logging, no async. Operations
//! that change data return a description of what they changed so callers can
//! decide how to report it.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod scene_graph;
pub mod value_objects;

pub use aggregates::Quest;
pub use entities::{Character, Choice, Item, Location, Scene};
pub use error::DomainError;
pub use ids::{QuestId, SessionId};
pub use scene_graph::{
    dangling_choices, repair_scene_graph, scene_ordinal, unreachable_scenes, EndingReason,
    RepairAction, RepairReport, RetargetReason,
};
pub use value_objects::{
    QuestBrief, CUSTOM_SELECTOR, DEFAULT_CHARACTER_COUNT, DEFAULT_SCENE_COUNT,
    MAX_CHARACTER_COUNT, MAX_SCENE_COUNT,
};
