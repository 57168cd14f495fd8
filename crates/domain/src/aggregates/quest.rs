//! Quest aggregate - one fully generated, repaired quest

use serde::{Deserialize, Serialize};

use crate::entities::{Character, Item, Location, Scene};
use crate::value_objects::QuestBrief;
use crate::QuestId;

/// A complete quest: the scene graph plus everything it references.
///
/// The first scene is the entry scene. Quests are built once per request and
/// never modified after delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub setting: String,
    pub quest_style: String,
    pub starting_point: String,
    pub characters: Vec<Character>,
    pub locations: Vec<Location>,
    pub items: Vec<Item>,
    pub scenes: Vec<Scene>,
}

impl Quest {
    /// Assemble a quest from a brief and the outputs of every stage.
    pub fn assemble(
        brief: &QuestBrief,
        description: String,
        characters: Vec<Character>,
        locations: Vec<Location>,
        items: Vec<Item>,
        scenes: Vec<Scene>,
    ) -> Self {
        Self {
            id: QuestId::new(),
            title: brief.title(),
            description,
            setting: brief.setting().to_string(),
            quest_style: brief.quest_style().to_string(),
            starting_point: brief.starting_point().to_string(),
            characters,
            locations,
            items,
            scenes,
        }
    }

    /// The scene a reader starts from.
    pub fn entry_scene(&self) -> Option<&Scene> {
        self.scenes.first()
    }
}
