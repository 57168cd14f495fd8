//! The five generation stages.
//!
//! Stages run strictly in order: description, characters, locations, items,
//! scenes. Each one asks the generation capability for text and falls back to
//! deterministic content when the capability refuses, errors or times out, or
//! when nothing usable survives extraction and validation. No stage fails.

use std::sync::Arc;

use screate_domain::{
    repair_scene_graph, unreachable_scenes, Character, Item, Location, Quest, QuestBrief,
    RepairAction, RepairReport, Scene,
};

use super::capability::GenerationCapability;
use super::extract::extract_json;
use super::fallback;
use super::prompts;
use super::records::{validate_records, QuestRecord};
use crate::infrastructure::ports::ClockPort;

pub struct QuestPipeline {
    capability: Arc<GenerationCapability>,
    clock: Arc<dyn ClockPort>,
}

impl QuestPipeline {
    pub fn new(capability: Arc<GenerationCapability>, clock: Arc<dyn ClockPort>) -> Self {
        Self { capability, clock }
    }

    /// Unix seconds, appended to every prompt.
    fn freshness_token(&self) -> i64 {
        self.clock.now().timestamp()
    }

    pub async fn description(&self, brief: &QuestBrief) -> String {
        let prompt = prompts::description_prompt(brief, self.freshness_token());

        match self.capability.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(stage = "description", "Model returned empty text, using fallback");
                fallback::description(brief)
            }
            Err(e) => {
                tracing::warn!(stage = "description", error = %e, "Generation failed, using fallback");
                fallback::description(brief)
            }
        }
    }

    pub async fn characters(&self, brief: &QuestBrief) -> Vec<Character> {
        let prompt = prompts::characters_prompt(brief, self.freshness_token());
        self.generate_records(&prompt)
            .await
            .unwrap_or_else(|| fallback::characters(brief))
    }

    pub async fn locations(&self, brief: &QuestBrief) -> Vec<Location> {
        let prompt = prompts::locations_prompt(brief, self.freshness_token());
        self.generate_records(&prompt)
            .await
            .unwrap_or_else(|| fallback::locations(brief))
    }

    pub async fn items(&self, brief: &QuestBrief) -> Vec<Item> {
        let prompt = prompts::items_prompt(brief, self.freshness_token());
        self.generate_records(&prompt)
            .await
            .unwrap_or_else(fallback::items)
    }

    /// Generate scenes, then repair the graph so every choice resolves.
    pub async fn scenes(
        &self,
        brief: &QuestBrief,
        characters: &[Character],
        locations: &[Location],
        items: &[Item],
    ) -> Vec<Scene> {
        let prompt =
            prompts::scenes_prompt(brief, characters, locations, items, self.freshness_token());
        let mut scenes = self
            .generate_records(&prompt)
            .await
            .unwrap_or_else(|| fallback::scenes(brief, characters, locations));

        let report = repair_scene_graph(&mut scenes);
        log_repair(&report);

        let unreachable = unreachable_scenes(&scenes);
        if !unreachable.is_empty() {
            tracing::info!(?unreachable, "Some scenes cannot be reached from the entry scene");
        }

        scenes
    }

    /// Run every stage and assemble the finished quest.
    pub async fn run(&self, brief: &QuestBrief) -> Quest {
        let description = self.description(brief).await;
        let characters = self.characters(brief).await;
        let locations = self.locations(brief).await;
        let items = self.items(brief).await;
        let scenes = self.scenes(brief, &characters, &locations, &items).await;

        Quest::assemble(brief, description, characters, locations, items, scenes)
    }

    /// `None` means the stage should fall back.
    async fn generate_records<T: QuestRecord>(&self, prompt: &str) -> Option<Vec<T>> {
        let text = match self.capability.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(stage = T::KIND, error = %e, "Generation failed, using fallback");
                return None;
            }
        };

        let value = match extract_json(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(stage = T::KIND, error = %e, "Could not extract JSON, using fallback");
                return None;
            }
        };

        let records = validate_records::<T>(value);
        if records.is_empty() {
            tracing::warn!(stage = T::KIND, "No usable records, using fallback");
            return None;
        }

        tracing::debug!(stage = T::KIND, count = records.len(), "Stage generated records");
        Some(records)
    }
}

fn log_repair(report: &RepairReport) {
    if report.is_clean() {
        return;
    }
    tracing::info!(
        retargeted = report.retargeted(),
        endings_created = report.endings_created(),
        "Repaired scene graph"
    );
    for action in &report.actions {
        match action {
            RepairAction::Retargeted {
                scene_id,
                choice_id,
                from,
                to,
                reason,
            } => tracing::info!(
                %scene_id, %choice_id, %from, %to, ?reason,
                "Redirected dangling choice"
            ),
            RepairAction::MadeEnding {
                scene_id,
                reason,
                discarded_choices,
            } => tracing::info!(
                %scene_id, ?reason, discarded_choices,
                "Turned scene into an ending"
            ),
            RepairAction::EndingFlagCleared { scene_id } => {
                tracing::info!(%scene_id, "Cleared ending flag on scene with choices")
            }
        }
    }
}
