//! Prompt builders for the five generation stages.
//!
//! Every prompt ends with a timestamp so identical requests do not hit a
//! cached completion, and (except the description) demands a bare JSON array
//! shaped like the example it embeds.

use screate_domain::{Character, Item, Location, QuestBrief};

/// How many names of each kind the scenes prompt mentions.
const CONTEXT_NAMES: usize = 3;

fn optional_line(label: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!("{label}: {v}\n"))
        .unwrap_or_default()
}

fn names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.take(CONTEXT_NAMES).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

pub fn description_prompt(brief: &QuestBrief, timestamp: i64) -> String {
    format!(
        "Write a short plot summary for a quest set in \"{setting}\" in the \"{style}\" style.\n\
         Starting point: {start}\n\
         {goal}{themes}\
         Tone: {tone}. Complexity: {complexity}.\n\
         \n\
         The summary must be:\n\
         - short (2-3 sentences)\n\
         - intriguing\n\
         - set the overall tone of the adventure\n\
         \n\
         Timestamp: {timestamp}\n\
         Return ONLY the summary text, with no extra formatting!",
        setting = brief.setting(),
        style = brief.quest_style(),
        start = brief.starting_point(),
        goal = optional_line("Main goal", brief.main_goal()),
        themes = optional_line("Themes", brief.themes()),
        tone = brief.tone(),
        complexity = brief.complexity(),
    )
}

pub fn characters_prompt(brief: &QuestBrief, timestamp: i64) -> String {
    format!(
        "Create {count} characters for a quest set in \"{setting}\".\n\
         \n\
         Return ONLY a JSON array in this format:\n\
         [{{\n\
         \x20   \"id\": \"character_1\",\n\
         \x20   \"name\": \"Unique name\",\n\
         \x20   \"role\": \"role\",\n\
         \x20   \"description\": \"description\",\n\
         \x20   \"motivation\": \"motivation\",\n\
         \x20   \"is_ally\": true,\n\
         \x20   \"is_enemy\": false\n\
         }}]\n\
         \n\
         Timestamp: {timestamp}\n\
         ONLY JSON, no additional text!",
        count = brief.character_count(),
        setting = brief.setting(),
    )
}

pub fn locations_prompt(brief: &QuestBrief, timestamp: i64) -> String {
    format!(
        "Create {count} locations for a quest set in \"{setting}\".\n\
         The first location is connected to \"{start}\".\n\
         \n\
         Return ONLY a JSON array in this format:\n\
         [{{\n\
         \x20   \"id\": \"location_1\",\n\
         \x20   \"name\": \"Location name\",\n\
         \x20   \"description\": \"Location description\"\n\
         }}]\n\
         \n\
         Timestamp: {timestamp}\n\
         ONLY JSON, no additional text!",
        count = brief.scene_count(),
        setting = brief.setting(),
        start = brief.starting_point(),
    )
}

pub fn items_prompt(brief: &QuestBrief, timestamp: i64) -> String {
    format!(
        "Create 3-5 items for a quest set in \"{setting}\".\n\
         \n\
         Return ONLY a JSON array in this format:\n\
         [{{\n\
         \x20   \"id\": \"item_1\",\n\
         \x20   \"name\": \"Item name\",\n\
         \x20   \"description\": \"Item description\",\n\
         \x20   \"is_key\": true,\n\
         \x20   \"effect\": \"Item effect\"\n\
         }}]\n\
         \n\
         Timestamp: {timestamp}\n\
         ONLY JSON, no additional text!",
        setting = brief.setting(),
    )
}

pub fn scenes_prompt(
    brief: &QuestBrief,
    characters: &[Character],
    locations: &[Location],
    items: &[Item],
    timestamp: i64,
) -> String {
    format!(
        "Create {count} scenes for a quest set in \"{setting}\" in the \"{style}\" style.\n\
         Tone: {tone}. Complexity: {complexity}.\n\
         Characters: {characters}\n\
         Locations: {locations}\n\
         Items: {items}\n\
         \n\
         Return ONLY a JSON array in this format:\n\
         [{{\n\
         \x20   \"id\": \"scene_1\",\n\
         \x20   \"title\": \"Scene title\",\n\
         \x20   \"description\": \"Scene description\",\n\
         \x20   \"location_id\": \"location_1\",\n\
         \x20   \"characters\": [\"character_1\"],\n\
         \x20   \"items\": [\"item_1\"],\n\
         \x20   \"choices\": [{{\n\
         \x20       \"id\": \"choice_1_1\",\n\
         \x20       \"text\": \"Choice text\",\n\
         \x20       \"next_scene_id\": \"scene_2\",\n\
         \x20       \"consequence\": \"Consequence\"\n\
         \x20   }}],\n\
         \x20   \"is_ending\": false\n\
         }}]\n\
         \n\
         Timestamp: {timestamp}\n\
         ONLY JSON, no additional text!",
        count = brief.scene_count(),
        setting = brief.setting(),
        style = brief.quest_style(),
        tone = brief.tone(),
        complexity = brief.complexity(),
        characters = names(characters.iter().map(|c| c.name.as_str())),
        locations = names(locations.iter().map(|l| l.name.as_str())),
        items = names(items.iter().map(|i| i.name.as_str())),
    )
}
