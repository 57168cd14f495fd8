//! Record validation: the only place raw model JSON becomes typed records.
//!
//! `filter_records` enforces the required-field contract on loose JSON
//! objects. `validate_records` then converts each survivor into its typed
//! record, dropping the ones that do not fit.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use screate_domain::{Character, Item, Location, Scene};

/// A loosely-typed record as the model produced it.
pub type RawRecord = Map<String, Value>;

/// Field that must hold an array (possibly empty) instead of a truthy value.
const CHOICES_FIELD: &str = "choices";

/// A record kind the pipeline asks the model for.
pub trait QuestRecord: DeserializeOwned {
    /// Label used in logs.
    const KIND: &'static str;
    /// Fields that must be present, checked in order.
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Clean up a raw record before typed conversion.
    fn normalize(_record: &mut RawRecord) {}
}

impl QuestRecord for Character {
    const KIND: &'static str = "character";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "role", "description"];
}

impl QuestRecord for Location {
    const KIND: &'static str = "location";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "description"];
}

impl QuestRecord for Item {
    const KIND: &'static str = "item";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "description"];
}

impl QuestRecord for Scene {
    const KIND: &'static str = "scene";
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["id", "title", "description", "location_id", CHOICES_FIELD];

    fn normalize(record: &mut RawRecord) {
        if let Some(Value::Array(choices)) = record.get_mut(CHOICES_FIELD) {
            let before = choices.len();
            choices.retain(Value::is_object);
            let dropped = before - choices.len();
            if dropped > 0 {
                tracing::warn!(dropped, "Removed non-object choice entries from scene");
            }
        }
    }
}

/// Python-style truthiness of a JSON value.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Name of the first required field the record fails, if any.
fn first_violation<'a>(record: &RawRecord, required: &[&'a str]) -> Option<&'a str> {
    required.iter().copied().find(|field| match record.get(*field) {
        None => true,
        Some(value) if *field == CHOICES_FIELD => !value.is_array(),
        Some(value) => is_falsy(value),
    })
}

/// Keep the objects of `value` that satisfy the required-field contract.
///
/// Never fails: a non-array input yields no records.
pub fn filter_records(value: Value, required: &[&str], kind: &str) -> Vec<RawRecord> {
    let Value::Array(elements) = value else {
        tracing::warn!(kind, "Expected a JSON array of records, got something else");
        return Vec::new();
    };

    let total = elements.len();
    let kept: Vec<RawRecord> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let Value::Object(record) = element else {
                tracing::warn!(kind, index, "Dropping non-object record");
                return None;
            };
            if let Some(field) = first_violation(&record, required) {
                tracing::warn!(kind, index, field, "Dropping record with missing or empty field");
                return None;
            }
            Some(record)
        })
        .collect();

    tracing::debug!(kind, total, kept = kept.len(), "Validated records");
    kept
}

/// Filter `value` and convert each survivor into `T`.
pub fn validate_records<T: QuestRecord>(value: Value) -> Vec<T> {
    filter_records(value, T::REQUIRED_FIELDS, T::KIND)
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut record)| {
            T::normalize(&mut record);
            match serde_json::from_value::<T>(Value::Object(record)) {
                Ok(typed) => Some(typed),
                Err(e) => {
                    tracing::warn!(kind = T::KIND, index, error = %e, "Dropping record that does not convert");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_incomplete_and_non_object_records_are_dropped() {
        let value = json!([{"id": "x"}, {"id": "y", "name": "Z"}, "not-a-map"]);

        let kept = filter_records(value, &["id", "name"], "character");

        assert_eq!(kept.len(), 1);
        assert_eq!(Value::Object(kept[0].clone()), json!({"id": "y", "name": "Z"}));
    }

    #[test]
    fn test_scene_contract_keeps_only_complete_records() {
        let value = json!([
            {"id": "s1", "title": "T", "description": "D", "location_id": "l1", "choices": []},
            {"id": "s2", "title": "", "description": "D", "location_id": "l1", "choices": []},
            "not a record",
            {"id": "s3", "title": "T", "description": "D", "location_id": "l1"}
        ]);

        let kept = filter_records(value, Scene::REQUIRED_FIELDS, Scene::KIND);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["id"], "s1");
    }

    #[test]
    fn test_choices_must_be_an_array() {
        let value = json!([
            {"id": "s1", "title": "T", "description": "D", "location_id": "l1", "choices": "go north"},
            {"id": "s2", "title": "T", "description": "D", "location_id": "l1", "choices": null}
        ]);

        assert!(filter_records(value, Scene::REQUIRED_FIELDS, Scene::KIND).is_empty());
    }

    #[test]
    fn test_falsy_values_are_rejected() {
        let required = ["id", "name", "description"];
        let value = json!([
            {"id": 0, "name": "A", "description": "D"},
            {"id": "x", "name": false, "description": "D"},
            {"id": "x", "name": "A", "description": []},
            {"id": "x", "name": "A", "description": {}},
            {"id": "x", "name": null, "description": "D"},
            {"id": 7, "name": true, "description": ["D"]}
        ]);

        let kept = filter_records(value, &required, "location");

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["id"], 7);
    }

    #[test]
    fn test_non_array_input_yields_nothing() {
        let value = json!({"characters": [{"id": "c1", "name": "N", "role": "R", "description": "D"}]});

        assert!(validate_records::<Character>(value).is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let value = json!([
            {"id": "item_2", "name": "Key", "description": "Rusty"},
            {"id": "item_1", "name": "Map", "description": "Torn"}
        ]);

        let items = validate_records::<Item>(value);

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item_2", "item_1"]);
    }

    #[test]
    fn test_record_with_wrong_field_type_is_dropped_individually() {
        let value = json!([
            {"id": "character_1", "name": "Mira", "role": "guide", "description": "Ferrywoman", "is_ally": "yes"},
            {"id": "character_2", "name": "Oren", "role": "rival", "description": "Smuggler", "is_enemy": true}
        ]);

        let characters = validate_records::<Character>(value);

        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].id, "character_2");
        assert_eq!(characters[0].is_enemy, Some(true));
    }

    #[test]
    fn test_scene_choices_drop_non_objects_before_conversion() {
        let value = json!([{
            "id": "scene_1",
            "title": "Harbor",
            "description": "Gulls",
            "location_id": "location_1",
            "choices": ["go", {"id": "choice_1_1", "text": "Sail", "next_scene_id": "scene_2"}, 3],
            "is_ending": null
        }]);

        let scenes = validate_records::<Scene>(value);

        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].choices.len(), 1);
        assert_eq!(scenes[0].choices[0].next_scene_id, "scene_2");
        assert!(!scenes[0].is_ending);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let value = json!([{"id": "location_1", "name": "Pier", "description": "Wet", "weather": "rain"}]);

        let locations = validate_records::<Location>(value);

        assert_eq!(locations[0].name, "Pier");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const FIELDS: [&str; 5] = ["id", "name", "role", "description", "choices"];

        fn arb_field_value() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                (-2i64..3).prop_map(Value::from),
                "[a-z]{0,3}".prop_map(Value::from),
                prop::collection::vec((0i64..3).prop_map(Value::from), 0..2).prop_map(Value::Array),
                Just(json!({})),
                Just(json!({"k": 1})),
            ]
        }

        fn arb_element() -> impl Strategy<Value = Value> {
            prop_oneof![
                4 => prop::collection::btree_map(prop::sample::select(FIELDS.to_vec()), arb_field_value(), 0..5)
                    .prop_map(|map| {
                        Value::Object(map.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
                    }),
                1 => arb_field_value(),
            ]
        }

        fn arb_required() -> impl Strategy<Value = Vec<&'static str>> {
            prop::sample::subsequence(FIELDS.to_vec(), 0..=FIELDS.len())
        }

        /// The field contract stated directly on a JSON value.
        fn satisfies(element: &Value, required: &[&str]) -> bool {
            let Value::Object(record) = element else {
                return false;
            };
            required.iter().all(|field| match record.get(*field) {
                None => false,
                Some(value) if *field == CHOICES_FIELD => value.is_array(),
                Some(Value::Null) | Some(Value::Bool(false)) => false,
                Some(Value::Number(n)) => n.as_f64() != Some(0.0),
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Array(a)) => !a.is_empty(),
                Some(Value::Object(o)) => !o.is_empty(),
                Some(Value::Bool(true)) => true,
            })
        }

        proptest! {
            #[test]
            fn kept_records_are_exactly_the_conforming_objects_in_order(
                elements in prop::collection::vec(arb_element(), 0..8),
                required in arb_required(),
            ) {
                let expected: Vec<Value> = elements
                    .iter()
                    .filter(|element| satisfies(element, &required))
                    .cloned()
                    .collect();

                let kept = filter_records(Value::Array(elements), &required, "record");

                let kept: Vec<Value> = kept.into_iter().map(Value::Object).collect();
                prop_assert_eq!(kept, expected);
            }

            #[test]
            fn non_array_input_keeps_nothing(element in arb_field_value(), required in arb_required()) {
                prop_assume!(!element.is_array());

                prop_assert!(filter_records(element, &required, "record").is_empty());
            }
        }
    }
}
