//! Value objects - Immutable objects defined by their attributes

mod quest_brief;

pub use quest_brief::{
    QuestBrief, CUSTOM_SELECTOR, DEFAULT_CHARACTER_COUNT, DEFAULT_SCENE_COUNT,
    MAX_CHARACTER_COUNT, MAX_SCENE_COUNT,
};
