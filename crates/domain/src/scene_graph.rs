//! Scene graph repair
//!
//! Generated scenes routinely point at scenes that were never generated. The
//! repair pass rewrites every dangling choice so that it targets an existing
//! scene, or demotes the scene to an ending when nothing can be targeted.
//! It never fails and never adds or removes scenes.
//!
//! Repair does not detect cycles and does not make every scene reachable;
//! `unreachable_scenes` reports the latter as a separate diagnostic.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::entities::Scene;

/// Prefix of the successor id derived from a scene's ordinal.
const SCENE_PREFIX: &str = "scene";

/// Why a dangling choice was sent where it was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetReason {
    /// The scene that follows the current one by ordinal
    NextInSequence,
    /// The lexicographically smallest id of any other scene
    FirstAvailable,
}

/// Why a scene was turned into an ending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingReason {
    /// No other scene exists to redirect to
    NoOtherScene,
    /// The scene id has no numeric suffix to derive a successor from
    UnparseableId,
}

/// One change made by the repair pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairAction {
    Retargeted {
        scene_id: String,
        choice_id: String,
        from: String,
        to: String,
        reason: RetargetReason,
    },
    MadeEnding {
        scene_id: String,
        reason: EndingReason,
        discarded_choices: usize,
    },
    /// The scene claimed to be an ending but still had valid choices
    EndingFlagCleared { scene_id: String },
}

/// Everything the repair pass changed, in the order it changed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub actions: Vec<RepairAction>,
}

impl RepairReport {
    /// True if the input graph was already valid.
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn retargeted(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RepairAction::Retargeted { .. }))
            .count()
    }

    pub fn endings_created(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RepairAction::MadeEnding { .. }))
            .count()
    }
}

/// Ordinal encoded in a scene id.
///
/// The ordinal is the text after the last `_`. Ids without `_` count as the
/// first scene. Returns `None` when the suffix is not an unsigned integer.
pub fn scene_ordinal(id: &str) -> Option<u64> {
    match id.rsplit_once('_') {
        Some((_, suffix)) => suffix.trim().parse().ok(),
        None => Some(1),
    }
}

/// Id of the scene that follows ordinal `ordinal`; none past `u64::MAX`.
fn successor_id(ordinal: u64) -> Option<String> {
    ordinal
        .checked_add(1)
        .map(|next| format!("{}_{}", SCENE_PREFIX, next))
}

/// Make every choice target an existing scene.
///
/// Scene ids are snapshotted once, before any scene is touched. For each
/// dangling choice, in order:
/// 1. retarget to the successor id (`scene_3` -> `scene_4`) if it exists;
/// 2. else retarget to the smallest other scene id;
/// 3. else (single-scene quest) make the scene an ending and stop.
///
/// A scene whose id carries no usable ordinal is made an ending as soon as one
/// of its choices dangles.
pub fn repair_scene_graph(scenes: &mut [Scene]) -> RepairReport {
    let ids: BTreeSet<String> = scenes.iter().map(|scene| scene.id.clone()).collect();
    let mut report = RepairReport::default();

    for scene in scenes.iter_mut() {
        repair_scene(scene, &ids, &mut report.actions);
    }

    report
}

fn repair_scene(scene: &mut Scene, ids: &BTreeSet<String>, actions: &mut Vec<RepairAction>) {
    for index in 0..scene.choices.len() {
        if ids.contains(&scene.choices[index].next_scene_id) {
            continue;
        }

        let Some(ordinal) = scene_ordinal(&scene.id) else {
            demote(scene, EndingReason::UnparseableId, actions);
            return;
        };

        let target = match successor_id(ordinal) {
            Some(successor) if ids.contains(&successor) => {
                Some((successor, RetargetReason::NextInSequence))
            }
            _ => ids
                .iter()
                .find(|id| **id != scene.id)
                .map(|id| (id.clone(), RetargetReason::FirstAvailable)),
        };

        let Some((to, reason)) = target else {
            demote(scene, EndingReason::NoOtherScene, actions);
            return;
        };

        let choice = &mut scene.choices[index];
        let from = std::mem::replace(&mut choice.next_scene_id, to.clone());
        actions.push(RepairAction::Retargeted {
            scene_id: scene.id.clone(),
            choice_id: choice.id.clone(),
            from,
            to,
            reason,
        });
    }

    if scene.is_ending && !scene.choices.is_empty() {
        scene.is_ending = false;
        actions.push(RepairAction::EndingFlagCleared {
            scene_id: scene.id.clone(),
        });
    }
}

fn demote(scene: &mut Scene, reason: EndingReason, actions: &mut Vec<RepairAction>) {
    let discarded_choices = scene.choices.len();
    scene.make_ending();
    actions.push(RepairAction::MadeEnding {
        scene_id: scene.id.clone(),
        reason,
        discarded_choices,
    });
}

/// Choices whose target does not name a scene in `scenes`.
///
/// Returned as `(scene_id, choice_id, target)`. Empty after a repair pass.
pub fn dangling_choices(scenes: &[Scene]) -> Vec<(String, String, String)> {
    let ids: HashSet<&str> = scenes.iter().map(|scene| scene.id.as_str()).collect();
    scenes
        .iter()
        .flat_map(|scene| {
            scene
                .choices
                .iter()
                .filter(|choice| !ids.contains(choice.next_scene_id.as_str()))
                .map(|choice| {
                    (
                        scene.id.clone(),
                        choice.id.clone(),
                        choice.next_scene_id.clone(),
                    )
                })
        })
        .collect()
}

/// Scenes that cannot be reached from the entry (first) scene.
///
/// Diagnostic only: the result is in scene order and the scenes are left as
/// they are.
pub fn unreachable_scenes(scenes: &[Scene]) -> Vec<String> {
    let Some(entry) = scenes.first() else {
        return Vec::new();
    };

    let by_id: HashMap<&str, &Scene> = scenes
        .iter()
        .map(|scene| (scene.id.as_str(), scene))
        .collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::from([entry.id.as_str()]);
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(scene) = by_id.get(id) {
            for choice in &scene.choices {
                if by_id.contains_key(choice.next_scene_id.as_str()) {
                    queue.push_back(choice.next_scene_id.as_str());
                }
            }
        }
    }

    scenes
        .iter()
        .filter(|scene| !visited.contains(scene.id.as_str()))
        .map(|scene| scene.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Choice;

    fn scene(id: &str, targets: &[&str]) -> Scene {
        targets.iter().enumerate().fold(
            Scene::new(id, format!("Title {id}"), "Description", "location_1"),
            |scene, (i, target)| scene.with_choice(Choice::new(format!("{id}_c{i}"), "Go", *target)),
        )
    }

    fn assert_structurally_valid(scenes: &[Scene]) {
        assert!(dangling_choices(scenes).is_empty(), "dangling: {:?}", dangling_choices(scenes));
        for scene in scenes {
            if scene.is_ending {
                assert!(scene.choices.is_empty(), "ending {} has choices", scene.id);
            }
            if !scene.choices.is_empty() {
                assert!(!scene.is_ending, "scene {} with choices is an ending", scene.id);
            }
        }
    }

    #[test]
    fn test_scene_ordinal() {
        assert_eq!(scene_ordinal("scene_1"), Some(1));
        assert_eq!(scene_ordinal("scene_12"), Some(12));
        assert_eq!(scene_ordinal("final_act_3"), Some(3));
        assert_eq!(scene_ordinal("prologue"), Some(1));
        assert_eq!(scene_ordinal("scene_x"), None);
        assert_eq!(scene_ordinal("scene_"), None);
    }

    #[test]
    fn test_single_scene_with_dangling_choice_becomes_ending() {
        let mut scenes = vec![scene("scene_1", &["scene_9"])];

        let report = repair_scene_graph(&mut scenes);

        assert!(scenes[0].is_ending);
        assert!(scenes[0].choices.is_empty());
        assert_eq!(report.endings_created(), 1);
        assert_eq!(report.retargeted(), 0);
        assert_eq!(
            report.actions,
            vec![RepairAction::MadeEnding {
                scene_id: "scene_1".into(),
                reason: EndingReason::NoOtherScene,
                discarded_choices: 1,
            }]
        );
    }

    #[test]
    fn test_dangling_choice_is_sent_to_successor() {
        let mut scenes = vec![scene("scene_1", &["scene_9"]), scene("scene_2", &[])];

        let report = repair_scene_graph(&mut scenes);

        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_2");
        assert_eq!(report.retargeted(), 1);
        assert!(matches!(
            report.actions[0],
            RepairAction::Retargeted {
                reason: RetargetReason::NextInSequence,
                ..
            }
        ));
    }

    #[test]
    fn test_last_scene_falls_back_to_smallest_other_id() {
        let mut scenes = vec![
            scene("scene_3", &["scene_99"]),
            scene("scene_2", &[]),
            scene("scene_1", &[]),
        ];

        repair_scene_graph(&mut scenes);

        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_1");
    }

    #[test]
    fn test_fallback_never_targets_the_scene_itself() {
        let mut scenes = vec![scene("scene_1", &[]), scene("scene_5", &["nowhere"])];

        repair_scene_graph(&mut scenes);

        assert_eq!(scenes[1].choices[0].next_scene_id, "scene_1");
    }

    #[test]
    fn test_largest_ordinal_has_no_successor() {
        let last = format!("scene_{}", u64::MAX);
        let mut scenes = vec![scene(&last, &["nowhere"]), scene("scene_1", &[])];

        let report = repair_scene_graph(&mut scenes);

        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_1");
        assert!(matches!(
            report.actions[0],
            RepairAction::Retargeted {
                reason: RetargetReason::FirstAvailable,
                ..
            }
        ));
    }

    #[test]
    fn test_unparseable_id_with_dangling_choice_becomes_ending() {
        let mut scenes = vec![
            scene("scene_intro", &["scene_2", "missing"]),
            scene("scene_2", &[]),
        ];

        let report = repair_scene_graph(&mut scenes);

        assert!(scenes[0].is_ending);
        assert!(scenes[0].choices.is_empty());
        assert!(matches!(
            report.actions[0],
            RepairAction::MadeEnding {
                reason: EndingReason::UnparseableId,
                discarded_choices: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_unparseable_id_with_valid_choices_is_untouched() {
        let mut scenes = vec![scene("scene_intro", &["scene_2"]), scene("scene_2", &[])];
        let before = scenes.clone();

        let report = repair_scene_graph(&mut scenes);

        assert!(report.is_clean());
        assert_eq!(scenes, before);
    }

    #[test]
    fn test_id_without_underscore_counts_as_first_scene() {
        let mut scenes = vec![scene("prologue", &["missing"]), scene("scene_2", &[])];

        repair_scene_graph(&mut scenes);

        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_2");
    }

    #[test]
    fn test_empty_target_is_treated_as_dangling() {
        let mut scenes = vec![scene("scene_1", &[""]), scene("scene_2", &[])];

        repair_scene_graph(&mut scenes);

        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_2");
    }

    #[test]
    fn test_ending_flag_cleared_when_choices_survive() {
        let mut scenes = vec![scene("scene_1", &["scene_2"]), scene("scene_2", &[])];
        scenes[0].is_ending = true;

        let report = repair_scene_graph(&mut scenes);

        assert!(!scenes[0].is_ending);
        assert_eq!(
            report.actions,
            vec![RepairAction::EndingFlagCleared {
                scene_id: "scene_1".into()
            }]
        );
    }

    #[test]
    fn test_valid_graph_is_untouched() {
        let mut scenes = vec![
            scene("scene_1", &["scene_2", "scene_3"]),
            scene("scene_2", &["scene_3"]),
            scene("scene_3", &[]),
        ];
        scenes[2].is_ending = true;
        let before = scenes.clone();

        let report = repair_scene_graph(&mut scenes);

        assert!(report.is_clean());
        assert_eq!(scenes, before);
    }

    #[test]
    fn test_repair_is_idempotent_and_leaves_no_dangling_edges() {
        let layouts: Vec<Vec<Scene>> = vec![
            vec![scene("scene_1", &["scene_9"])],
            vec![scene("scene_1", &["a", "b"]), scene("scene_2", &["scene_1", "c"])],
            vec![
                scene("scene_1", &["scene_2"]),
                scene("scene_2", &["scene_7", "scene_3"]),
                scene("scene_3", &["scene_4"]),
            ],
            vec![scene("intro_x", &["z"]), scene("b_2", &["q"]), scene("b_3", &[""])],
            vec![scene("scene_2", &["scene_2"]), scene("scene_10", &["scene_11"])],
        ];

        for mut scenes in layouts {
            let ids_before: Vec<String> = scenes.iter().map(|s| s.id.clone()).collect();

            repair_scene_graph(&mut scenes);
            assert_structurally_valid(&scenes);

            let ids_after: Vec<String> = scenes.iter().map(|s| s.id.clone()).collect();
            assert_eq!(ids_before, ids_after);

            let once = scenes.clone();
            let second = repair_scene_graph(&mut scenes);
            assert!(second.is_clean());
            assert_eq!(scenes, once);
        }
    }

    #[test]
    fn test_unreachable_scenes() {
        let scenes = vec![
            scene("scene_1", &["scene_2"]),
            scene("scene_2", &["scene_1"]),
            scene("scene_3", &["scene_1"]),
        ];

        assert_eq!(unreachable_scenes(&scenes), vec!["scene_3".to_string()]);
        assert!(unreachable_scenes(&[]).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Ids that mix the `scene_N` convention with ones repair cannot parse.
        fn arb_scene_id() -> impl Strategy<Value = String> {
            prop_oneof![
                4 => (1u64..8).prop_map(|n| format!("scene_{n}")),
                1 => Just("prologue".to_string()),
                1 => Just("act_two".to_string()),
                1 => (1u64..4).prop_map(|n| format!("cave_{n}")),
            ]
        }

        fn arb_target() -> impl Strategy<Value = String> {
            prop_oneof![
                4 => arb_scene_id(),
                1 => Just(String::new()),
                1 => "[a-z]{1,6}",
            ]
        }

        fn arb_scenes() -> impl Strategy<Value = Vec<Scene>> {
            prop::collection::btree_set(arb_scene_id(), 0..6).prop_flat_map(|ids| {
                let count = ids.len();
                (
                    Just(ids),
                    prop::collection::vec(
                        (prop::collection::vec(arb_target(), 0..4), any::<bool>()),
                        count,
                    ),
                )
                    .prop_map(|(ids, shapes)| {
                        ids.into_iter()
                            .zip(shapes)
                            .map(|(id, (targets, is_ending))| {
                                let targets: Vec<&str> =
                                    targets.iter().map(String::as_str).collect();
                                let mut scene = scene(&id, &targets);
                                scene.is_ending = is_ending;
                                scene
                            })
                            .collect()
                    })
            })
        }

        proptest! {
            #[test]
            fn repair_yields_a_valid_graph(mut scenes in arb_scenes()) {
                let ids_before: Vec<String> = scenes.iter().map(|s| s.id.clone()).collect();

                repair_scene_graph(&mut scenes);

                prop_assert!(dangling_choices(&scenes).is_empty());
                for scene in &scenes {
                    prop_assert!(!(scene.is_ending && !scene.choices.is_empty()));
                }
                let ids_after: Vec<String> = scenes.iter().map(|s| s.id.clone()).collect();
                prop_assert_eq!(ids_before, ids_after);
            }

            #[test]
            fn repair_is_idempotent(mut scenes in arb_scenes()) {
                repair_scene_graph(&mut scenes);
                let once = scenes.clone();

                let second = repair_scene_graph(&mut scenes);

                prop_assert!(second.is_clean());
                prop_assert_eq!(scenes, once);
            }

            #[test]
            fn valid_choices_are_never_rewritten(mut scenes in arb_scenes()) {
                let ids: HashSet<String> = scenes.iter().map(|s| s.id.clone()).collect();
                let kept_before: Vec<(String, String)> = scenes
                    .iter()
                    .flat_map(|s| s.choices.iter().map(move |c| (s.id.clone(), c.clone())))
                    .filter(|(_, c)| ids.contains(&c.next_scene_id))
                    .map(|(id, c)| (id, c.id))
                    .collect();

                let report = repair_scene_graph(&mut scenes);

                // A valid choice only disappears when its scene is demoted
                for (scene_id, choice_id) in kept_before {
                    let scene = scenes.iter().find(|s| s.id == scene_id).unwrap();
                    let demoted = report.actions.iter().any(|a| {
                        matches!(a, RepairAction::MadeEnding { scene_id: id, .. } if *id == scene_id)
                    });
                    prop_assert!(demoted || scene.choices.iter().any(|c| c.id == choice_id));
                }
            }
        }
    }
}
