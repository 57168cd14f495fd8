//! Quest brief - the resolved, validated parameters of one generation request

use crate::DomainError;

/// Selector value that tells us to read the free-text override instead.
pub const CUSTOM_SELECTOR: &str = "custom";

pub const DEFAULT_SCENE_COUNT: u32 = 3;
pub const DEFAULT_CHARACTER_COUNT: u32 = 3;
pub const MAX_SCENE_COUNT: u32 = 20;
pub const MAX_CHARACTER_COUNT: u32 = 10;

/// Everything the pipeline needs to know about a request.
///
/// Fallback data is derived from a brief alone, so two equal briefs always
/// degrade to the same quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestBrief {
    setting: String,
    custom_setting: bool,
    quest_style: String,
    starting_point: String,
    scene_count: u32,
    character_count: u32,
    complexity: String,
    tone: String,
    main_goal: Option<String>,
    themes: Option<String>,
}

impl QuestBrief {
    /// Resolve the setting and style selectors against their overrides.
    pub fn new(
        setting: &str,
        custom_setting: Option<&str>,
        quest_style: &str,
        custom_quest_style: Option<&str>,
        starting_point: &str,
    ) -> Result<Self, DomainError> {
        let is_custom_setting = setting.trim() == CUSTOM_SELECTOR;
        let setting = resolve_selector("setting", setting, custom_setting)?;
        let quest_style = resolve_selector("quest_style", quest_style, custom_quest_style)?;

        let starting_point = starting_point.trim();
        if starting_point.is_empty() {
            return Err(DomainError::validation("starting_point is required"));
        }

        Ok(Self {
            setting,
            custom_setting: is_custom_setting,
            quest_style,
            starting_point: starting_point.to_string(),
            scene_count: DEFAULT_SCENE_COUNT,
            character_count: DEFAULT_CHARACTER_COUNT,
            complexity: "medium".to_string(),
            tone: "serious".to_string(),
            main_goal: None,
            themes: None,
        })
    }

    pub fn with_scene_count(mut self, count: u32) -> Result<Self, DomainError> {
        if !(1..=MAX_SCENE_COUNT).contains(&count) {
            return Err(DomainError::out_of_range("scene_count", 1, MAX_SCENE_COUNT, count));
        }
        self.scene_count = count;
        Ok(self)
    }

    pub fn with_character_count(mut self, count: u32) -> Result<Self, DomainError> {
        if !(1..=MAX_CHARACTER_COUNT).contains(&count) {
            return Err(DomainError::out_of_range(
                "character_count",
                1,
                MAX_CHARACTER_COUNT,
                count,
            ));
        }
        self.character_count = count;
        Ok(self)
    }

    pub fn with_complexity(mut self, complexity: impl Into<String>) -> Self {
        self.complexity = complexity.into();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_main_goal(mut self, main_goal: Option<String>) -> Self {
        self.main_goal = non_blank(main_goal);
        self
    }

    pub fn with_themes(mut self, themes: Option<String>) -> Self {
        self.themes = non_blank(themes);
        self
    }

    // Read-only accessors

    /// Setting as shown to the model (override applied)
    pub fn setting(&self) -> &str {
        &self.setting
    }

    pub fn quest_style(&self) -> &str {
        &self.quest_style
    }

    pub fn starting_point(&self) -> &str {
        &self.starting_point
    }

    pub fn scene_count(&self) -> u32 {
        self.scene_count
    }

    pub fn character_count(&self) -> u32 {
        self.character_count
    }

    pub fn complexity(&self) -> &str {
        &self.complexity
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn main_goal(&self) -> Option<&str> {
        self.main_goal.as_deref()
    }

    pub fn themes(&self) -> Option<&str> {
        self.themes.as_deref()
    }

    /// Quest title announced at the start of a session.
    ///
    /// Predefined settings are title-cased (`post-apocalyptic` becomes
    /// `Post-Apocalyptic`); custom settings are used verbatim.
    pub fn title(&self) -> String {
        if self.custom_setting {
            format!("Quest: {}", self.setting)
        } else {
            format!("Quest: {}", title_case(&self.setting))
        }
    }
}

fn resolve_selector(
    field: &'static str,
    selector: &str,
    custom: Option<&str>,
) -> Result<String, DomainError> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    if selector != CUSTOM_SELECTOR {
        return Ok(selector.to_string());
    }

    match custom.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => Err(DomainError::validation(format!(
            "custom_{field} is required when {field} is \"{CUSTOM_SELECTOR}\""
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(ch);
            at_word_start = true;
        }
    }
    result
}
