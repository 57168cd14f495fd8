//! Item entity - Objects the hero can find or use

use serde::{Deserialize, Serialize};

/// An item generated for a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Key items are required to finish the quest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            is_key: None,
            effect: None,
        }
    }

    pub fn with_key(mut self, is_key: bool) -> Self {
        self.is_key = Some(is_key);
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }
}
