//! Deterministic stand-in content for stages the model could not fill.
//!
//! Everything here depends only on the brief (and, for scenes, on the ids
//! already chosen), so two fallback runs of the same request are identical.

use screate_domain::{Character, Choice, Item, Location, QuestBrief, Scene};

const FALLBACK_ITEM_COUNT: u32 = 3;

pub fn description(brief: &QuestBrief) -> String {
    format!(
        "An exciting adventure in the world of {}, full of unexpected twists and difficult choices.",
        brief.setting()
    )
}

pub fn characters(brief: &QuestBrief) -> Vec<Character> {
    (1..=brief.character_count())
        .map(|i| {
            Character::new(
                format!("character_{i}"),
                format!("Character {i}"),
                "guide",
                "A mysterious figure",
            )
            .with_motivation("Help the hero")
            .with_allegiance(true, false)
        })
        .collect()
}

pub fn locations(brief: &QuestBrief) -> Vec<Location> {
    (1..=brief.scene_count())
        .map(|i| {
            Location::new(
                format!("location_{i}"),
                format!("Location {i}"),
                "A mysterious place",
            )
        })
        .collect()
}

pub fn items() -> Vec<Item> {
    (1..=FALLBACK_ITEM_COUNT)
        .map(|i| {
            Item::new(
                format!("item_{i}"),
                format!("Item {i}"),
                "A mysterious artifact",
            )
            .with_key(i == 1)
            .with_effect("Unknown effect")
        })
        .collect()
}

/// A linear chain `scene_1 → … → scene_n`, the last one an ending.
pub fn scenes(brief: &QuestBrief, characters: &[Character], locations: &[Location]) -> Vec<Scene> {
    let count = brief.scene_count();
    let location_id = locations
        .first()
        .map(|l| l.id.clone())
        .unwrap_or_else(|| "location_1".to_string());
    let featured: Vec<String> = characters.first().map(|c| c.id.clone()).into_iter().collect();

    (1..=count)
        .map(|i| {
            let mut scene = Scene::new(
                format!("scene_{i}"),
                format!("Scene {i}"),
                format!("Description of scene {i}"),
                location_id.clone(),
            )
            .with_characters(featured.clone())
            .with_items(Vec::new());

            if i < count {
                scene = scene.with_choice(
                    Choice::new(format!("choice_{i}_1"), "Continue", format!("scene_{}", i + 1))
                        .with_consequence("The story continues"),
                );
            } else {
                scene.make_ending();
            }
            scene
        })
        .collect()
}
