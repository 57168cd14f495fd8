//! Aggregate roots - domain objects that own their related data
//!
//! A quest owns its characters, locations, items and scenes. Mutations of the
//! scene graph return events describing what changed (see `scene_graph`)
//! instead of logging from inside the domain.

mod quest;

pub use quest::Quest;
