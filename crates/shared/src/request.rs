//! Quest generation request body.

use serde::{Deserialize, Serialize};

use screate_domain::{DomainError, QuestBrief, DEFAULT_CHARACTER_COUNT, DEFAULT_SCENE_COUNT};

fn default_scene_count() -> u32 {
    DEFAULT_SCENE_COUNT
}

fn default_character_count() -> u32 {
    DEFAULT_CHARACTER_COUNT
}

fn default_complexity() -> String {
    "medium".to_string()
}

fn default_tone() -> String {
    "serious".to_string()
}

/// Body of `POST /api/generate-quest` and `POST /api/generate-quest-stream`.
///
/// `setting` and `quest_style` are selector identifiers (`fantasy`,
/// `detective`, ...). The value `custom` switches to the matching
/// `custom_*` free-text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRequest {
    pub setting: String,
    pub starting_point: String,
    pub quest_style: String,
    #[serde(default)]
    pub custom_setting: Option<String>,
    #[serde(default)]
    pub custom_quest_style: Option<String>,
    #[serde(default = "default_scene_count")]
    pub scene_count: u32,
    #[serde(default = "default_character_count")]
    pub character_count: u32,
    #[serde(default = "default_complexity")]
    pub complexity: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub main_goal: Option<String>,
    #[serde(default)]
    pub themes: Option<String>,
}

impl QuestRequest {
    /// Resolve selectors and check bounds.
    pub fn into_brief(self) -> Result<QuestBrief, DomainError> {
        let brief = QuestBrief::new(
            &self.setting,
            self.custom_setting.as_deref(),
            &self.quest_style,
            self.custom_quest_style.as_deref(),
            &self.starting_point,
        )?
        .with_scene_count(self.scene_count)?
        .with_character_count(self.character_count)?
        .with_complexity(self.complexity)
        .with_tone(self.tone)
        .with_main_goal(self.main_goal)
        .with_themes(self.themes);

        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body_uses_defaults() {
        let request: QuestRequest = serde_json::from_str(
            r#"{"setting": "fantasy", "starting_point": "A ruined chapel", "quest_style": "adventure"}"#,
        )
        .unwrap();

        assert_eq!(request.scene_count, 3);
        assert_eq!(request.character_count, 3);
        assert_eq!(request.complexity, "medium");
        assert_eq!(request.tone, "serious");

        let brief = request.into_brief().unwrap();
        assert_eq!(brief.setting(), "fantasy");
        assert_eq!(brief.starting_point(), "A ruined chapel");
    }

    #[test]
    fn test_out_of_range_count_is_rejected() {
        let request: QuestRequest = serde_json::from_str(
            r#"{"setting": "horror", "starting_point": "A manor", "quest_style": "horror", "scene_count": 0}"#,
        )
        .unwrap();

        let err = request.into_brief().unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange { field: "scene_count", .. }));
    }
}
