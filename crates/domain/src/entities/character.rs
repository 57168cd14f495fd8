//! Character entity - A person the hero can meet during the quest

use serde::{Deserialize, Serialize};

/// A character generated for a quest.
///
/// Simple data struct: `is_ally` and `is_enemy` are independent flags and are
/// not checked for exclusivity, since the model is free to describe a
/// double agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique within one quest (e.g. `character_1`)
    pub id: String,
    pub name: String,
    /// Free-form role label ("guide", "antagonist", ...)
    pub role: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ally: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enemy: Option<bool>,
}

impl Character {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            description: description.into(),
            motivation: None,
            is_ally: None,
            is_enemy: None,
        }
    }

    pub fn with_motivation(mut self, motivation: impl Into<String>) -> Self {
        self.motivation = Some(motivation.into());
        self
    }

    pub fn with_allegiance(mut self, is_ally: bool, is_enemy: bool) -> Self {
        self.is_ally = Some(is_ally);
        self.is_enemy = Some(is_enemy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted_when_unset() {
        let character = Character::new("character_1", "Mira", "guide", "A ferrywoman");
        let json = serde_json::to_value(&character).unwrap();

        assert_eq!(json["id"], "character_1");
        assert!(json.get("motivation").is_none());
        assert!(json.get("is_ally").is_none());
    }

    #[test]
    fn test_ally_and_enemy_may_both_be_set() {
        let character = Character::new("character_2", "Vex", "spy", "Works for everyone")
            .with_allegiance(true, true);

        assert_eq!(character.is_ally, Some(true));
        assert_eq!(character.is_enemy, Some(true));
    }
}
