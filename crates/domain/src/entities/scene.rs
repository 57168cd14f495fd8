//! Scene entity - A node of the quest graph
//!
//! Scenes are the nodes and choices are the edges of the quest graph. A scene
//! with `is_ending = true` is terminal and carries no choices; a scene with at
//! least one choice is never terminal. `crate::scene_graph` restores both
//! properties on generated data.

use serde::{Deserialize, Deserializer, Serialize};

/// An outgoing edge of a scene.
///
/// `id`, `text` and `next_scene_id` default to empty strings when the model
/// leaves them out; an empty target is treated as dangling by the repair pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub next_scene_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    /// Items the hero must hold to pick this choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_items: Option<Vec<String>>,
}

impl Choice {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        next_scene_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_scene_id: next_scene_id.into(),
            consequence: None,
            required_items: None,
        }
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequence = Some(consequence.into());
        self
    }
}

/// A scene of the quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Encodes the scene's ordinal as a numeric suffix (`scene_3`)
    pub id: String,
    pub title: String,
    pub description: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_ending: bool,
}

impl Scene {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            location_id: location_id.into(),
            characters: None,
            items: None,
            choices: Vec::new(),
            is_ending: false,
        }
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_characters(mut self, characters: Vec<String>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = Some(items);
        self
    }

    /// Mark this scene terminal. Drops every outgoing choice.
    pub fn make_ending(&mut self) {
        self.is_ending = true;
        self.choices.clear();
    }

    /// True when the ending flag agrees with the choice list.
    pub fn is_consistent(&self) -> bool {
        !(self.is_ending && !self.choices.is_empty())
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
