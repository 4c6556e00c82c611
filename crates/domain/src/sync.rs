//! State synchronization - reconciling a record against configuration
//!
//! Whenever configuration is (re)loaded, persisted records may have the
//! wrong shape: attributes that no longer exist, new stats they never heard
//! of, inventory tabs whose slot counts changed. Synchronization rebuilds
//! each category to exactly the configuration's key set while preserving
//! every compatible value.
//!
//! Detection ([`needs_sync`]) and reconciliation ([`sync`]) are separate
//! pure operations: reconciliation is invoked from edit handlers that
//! already hold a fresh configuration, so detection exists for explicit
//! intent and testability rather than performance.

use std::collections::HashMap;

use crate::documents::InfoFieldDefinition;
use crate::formula;
use crate::record::CharacterRecord;
use crate::resolved::ResolvedConfiguration;

/// True if `record`'s shape differs from `config` anywhere the synchronizer
/// would touch: a key-set mismatch in attributes, combat stats, or info
/// fields, or an inventory tab whose current slot count differs from its
/// formula evaluated against the record's current attributes.
pub fn needs_sync(record: &CharacterRecord, config: &ResolvedConfiguration) -> bool {
    let attribute_ids: Vec<&str> = config
        .attributes()
        .attributes
        .iter()
        .map(|def| def.id.as_str())
        .collect();
    if key_set_differs(record.attributes(), &attribute_ids) {
        return true;
    }

    let stat_ids: Vec<&str> = config
        .combat_stats()
        .flattened()
        .map(|def| def.id.as_str())
        .collect();
    if key_set_differs(record.combat_stats(), &stat_ids) {
        return true;
    }

    let field_ids: Vec<&str> = config
        .character_info()
        .fields
        .iter()
        .map(InfoFieldDefinition::id)
        .collect();
    if key_set_differs(record.character_info(), &field_ids) {
        return true;
    }

    let tabs = &config.inventory().tabs;
    if record.inventory_slots().len() != tabs.len() {
        return true;
    }
    for tab in tabs {
        let required = formula::evaluate(&tab.slot_formula, record.attributes()) as usize;
        match record.inventory_slots().get(&tab.id) {
            Some(slots) if slots.len() == required => {}
            // Missing tab or wrong length
            _ => return true,
        }
    }
    false
}

/// Reconcile `record` to `config`, returning the updated record.
///
/// Per category the result contains exactly the configuration's keys:
/// existing values are preserved, missing keys take their schema default,
/// and keys with no home in the configuration are dropped (intentional loss
/// of orphaned data). Inventory slot counts are recomputed against the
/// *synchronized* attributes, so attributes reconcile before inventory;
/// shrinking arrays truncate from the end, growing arrays pad with the item
/// catalog's first value. Level and resource counters pass through
/// untouched. Idempotent: `sync(sync(r, c), c) == sync(r, c)`.
pub fn sync(record: &CharacterRecord, config: &ResolvedConfiguration) -> CharacterRecord {
    let mut updated = record.clone();

    let attributes: HashMap<String, f64> = config
        .attributes()
        .attributes
        .iter()
        .map(|def| {
            let value = record
                .attributes()
                .get(&def.id)
                .copied()
                .unwrap_or_else(|| def.schema.default_value());
            (def.id.clone(), value)
        })
        .collect();

    let combat_stats: HashMap<String, f64> = config
        .combat_stats()
        .flattened()
        .map(|def| {
            let value = record
                .combat_stats()
                .get(&def.id)
                .copied()
                .unwrap_or_else(|| def.schema.default_value());
            (def.id.clone(), value)
        })
        .collect();

    let character_info: HashMap<String, String> = config
        .character_info()
        .fields
        .iter()
        .map(|field| {
            let value = record
                .character_info()
                .get(field.id())
                .cloned()
                .unwrap_or_else(|| default_info_value(field, config));
            (field.id().to_string(), value)
        })
        .collect();

    // Attributes first: slot formulas read the synchronized values.
    let inventory_slots: HashMap<String, Vec<String>> = config
        .inventory()
        .tabs
        .iter()
        .map(|tab| {
            let required = formula::evaluate(&tab.slot_formula, &attributes) as usize;
            let pad = config
                .get_enum(&tab.enum_ref)
                .and_then(|def| def.first_value_name())
                .unwrap_or_default()
                .to_string();
            let existing = record.inventory_slots().get(&tab.id);
            let mut slots: Vec<String> = existing
                .map(|s| s.iter().take(required).cloned().collect())
                .unwrap_or_default();
            slots.resize(required, pad);
            (tab.id.clone(), slots)
        })
        .collect();

    updated.replace_attributes(attributes);
    updated.replace_combat_stats(combat_stats);
    updated.replace_character_info(character_info);
    updated.replace_inventory_slots(inventory_slots);
    updated
}

/// Default for an info field absent from the record: the declared default,
/// or the referenced enumeration's first value, or empty.
fn default_info_value(field: &InfoFieldDefinition, config: &ResolvedConfiguration) -> String {
    if let Some(default) = field.default_value() {
        return default.to_string();
    }
    field
        .enum_ref()
        .and_then(|id| config.get_enum(id))
        .and_then(|def| def.first_value_name())
        .unwrap_or_default()
        .to_string()
}

fn key_set_differs<V>(map: &HashMap<String, V>, ids: &[&str]) -> bool {
    map.len() != ids.len() || ids.iter().any(|id| !map.contains_key(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{
        AttributeDefinition, AttributesDocument, CharacterInfoDocument, CombatStatDefinition,
        CombatStatEntry, CombatStatsDocument, EnumDefinition, EnumValue, EnumsDocument,
        InfoFieldDefinition, InventoryDocument, InventoryTabDefinition, LevelBounds,
        LevelClassDocument,
    };
    use crate::numeric::NumericSchema;

    fn attribute(id: &str, default: f64) -> AttributeDefinition {
        AttributeDefinition {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: format!("The {} attribute", id),
            emoji: None,
            color: None,
            schema: NumericSchema::integer()
                .with_minimum(0.0)
                .with_maximum(20.0)
                .with_default(default),
        }
    }

    fn enum_def(id: &str, values: &[&str]) -> EnumDefinition {
        EnumDefinition {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: None,
            values: values.iter().map(|v| EnumValue::Plain(v.to_string())).collect(),
        }
    }

    /// A configuration with attributes STR/DEX, a health pair, a species
    /// field, and a backpack tab sized by `STR`.
    fn config(attribute_ids: &[(&str, f64)], backpack_formula: &str) -> ResolvedConfiguration {
        ResolvedConfiguration::resolve(
            EnumsDocument {
                enums: vec![
                    enum_def("species", &["Human", "Elf"]),
                    enum_def("classes", &["Warrior"]),
                    enum_def("items", &["Torch", "Rope"]),
                ],
            },
            AttributesDocument {
                title: "Attributes".to_string(),
                attributes: attribute_ids
                    .iter()
                    .map(|(id, default)| attribute(id, *default))
                    .collect(),
            },
            CharacterInfoDocument {
                title: "Character Info".to_string(),
                fields: vec![
                    InfoFieldDefinition::Text {
                        id: "name".to_string(),
                        label: "Name".to_string(),
                        placeholder: None,
                        required: true,
                        default: None,
                    },
                    InfoFieldDefinition::Enum {
                        id: "char_species".to_string(),
                        label: "Species".to_string(),
                        enum_ref: "species".to_string(),
                        required: false,
                        default: None,
                    },
                ],
            },
            CombatStatsDocument {
                title: "Combat".to_string(),
                stats: vec![CombatStatEntry::Paired(
                    CombatStatDefinition {
                        id: "health".to_string(),
                        label: "HP".to_string(),
                        description: "Current health".to_string(),
                        emoji: None,
                        color: None,
                        schema: NumericSchema::integer()
                            .with_minimum(0.0)
                            .with_dynamic_maximum()
                            .with_default(10.0),
                    },
                    CombatStatDefinition {
                        id: "health_max".to_string(),
                        label: "Max HP".to_string(),
                        description: "Maximum health".to_string(),
                        emoji: None,
                        color: None,
                        schema: NumericSchema::integer()
                            .with_minimum(1.0)
                            .with_maximum(999.0)
                            .with_default(10.0),
                    },
                )],
            },
            InventoryDocument {
                title: "Inventory".to_string(),
                tabs: vec![InventoryTabDefinition {
                    id: "backpack".to_string(),
                    label: "Backpack".to_string(),
                    enum_ref: "items".to_string(),
                    slot_formula: backpack_formula.to_string(),
                    empty_message: "Empty".to_string(),
                }],
            },
            LevelClassDocument {
                enum_ref: "classes".to_string(),
                levels: LevelBounds {
                    min: 1,
                    default: 1,
                    max: 20,
                },
                class_label: "Class".to_string(),
                level_label: "Level".to_string(),
            },
        )
        .expect("test configuration resolves")
    }

    #[test]
    fn fresh_record_needs_sync_and_fills_defaults() {
        let config = config(&[("STR", 7.0), ("DEX", 2.0)], "STR");
        let record = CharacterRecord::new();
        assert!(needs_sync(&record, &config));

        let synced = sync(&record, &config);
        assert_eq!(synced.attribute("STR"), Some(7.0));
        assert_eq!(synced.attribute("DEX"), Some(2.0));
        assert_eq!(synced.combat_stat("health"), Some(10.0));
        assert_eq!(synced.combat_stat("health_max"), Some(10.0));
        assert_eq!(synced.character_info()["name"], "");
        // Enum fields default to the referenced enumeration's first value
        assert_eq!(synced.character_info()["char_species"], "Human");
        // Slot count from the synchronized STR default
        assert_eq!(synced.inventory_slots()["backpack"].len(), 7);
        assert!(synced.inventory_slots()["backpack"].iter().all(|item| item == "Torch"));
        assert!(!needs_sync(&synced, &config));
    }

    #[test]
    fn sync_is_idempotent() {
        let config = config(&[("STR", 3.0)], "STR * 2");
        let record = CharacterRecord::new();
        let once = sync(&record, &config);
        let twice = sync(&once, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn values_survive_a_config_reshape() {
        let before = config(&[("STR", 3.0)], "STR");
        let mut record = sync(&CharacterRecord::new(), &before);
        record
            .set_attribute("STR", 5.0, &NumericSchema::integer().with_maximum(20.0))
            .expect("in range");
        record.set_info_field("name", "Ada");

        // New config adds WIS (default 7) and drops nothing
        let after = config(&[("STR", 3.0), ("WIS", 7.0)], "STR");
        let synced = sync(&record, &after);
        assert_eq!(synced.attribute("STR"), Some(5.0));
        assert_eq!(synced.attribute("WIS"), Some(7.0));
        assert_eq!(synced.character_info()["name"], "Ada");
    }

    #[test]
    fn orphaned_keys_are_dropped() {
        let before = config(&[("STR", 3.0), ("DEX", 2.0)], "1");
        let record = sync(&CharacterRecord::new(), &before);
        assert!(record.attributes().contains_key("DEX"));

        let after = config(&[("STR", 3.0)], "1");
        let synced = sync(&record, &after);
        assert!(!synced.attributes().contains_key("DEX"));
        assert!(needs_sync(&record, &after));
    }

    #[test]
    fn shrinking_slot_count_truncates_from_the_end() {
        let five = config(&[("STR", 5.0)], "STR");
        let mut record = sync(&CharacterRecord::new(), &five);
        for (i, item) in ["Rope", "Torch", "Rope", "Torch", "Rope"].iter().enumerate() {
            record.set_inventory_slot("backpack", i, *item).expect("in range");
        }

        let two = config(&[("STR", 2.0)], "STR");
        let synced = sync(&record, &two);
        // STR itself was preserved (5 fits the new schema), so re-evaluate:
        // the formula still yields 5. Force the shrink through the formula.
        assert_eq!(synced.inventory_slots()["backpack"].len(), 5);

        let halved = config(&[("STR", 5.0)], "STR / 2");
        let synced = sync(&record, &halved);
        let slots = &synced.inventory_slots()["backpack"];
        assert_eq!(slots, &vec!["Rope".to_string(), "Torch".to_string()]);
    }

    #[test]
    fn growing_slot_count_pads_with_catalog_first_value() {
        let config_small = config(&[("STR", 2.0)], "STR");
        let mut record = sync(&CharacterRecord::new(), &config_small);
        record.set_inventory_slot("backpack", 0, "Rope").expect("in range");

        let config_big = config(&[("STR", 2.0)], "STR * 2");
        let synced = sync(&record, &config_big);
        let slots = &synced.inventory_slots()["backpack"];
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], "Rope");
        assert_eq!(slots[1], "Torch");
        assert_eq!(slots[3], "Torch");
    }

    #[test]
    fn slot_length_drift_triggers_needs_sync() {
        let cfg = config(&[("STR", 3.0)], "STR");
        let mut record = sync(&CharacterRecord::new(), &cfg);
        assert!(!needs_sync(&record, &cfg));

        // Attribute edit changes the formula result but not the array
        record
            .set_attribute("STR", 4.0, &NumericSchema::integer().with_maximum(20.0))
            .expect("in range");
        assert!(needs_sync(&record, &cfg));
    }

    #[test]
    fn level_and_resource_counters_pass_through() {
        let cfg = config(&[("STR", 3.0)], "1");
        let mut record = CharacterRecord::new();
        record.set_level("Warrior", 4);
        record.adjust_resource_counter("gold", 25);

        let synced = sync(&record, &cfg);
        assert_eq!(synced.level().class_name, "Warrior");
        assert_eq!(synced.level().value, 4);
        assert_eq!(synced.resource_counters()["gold"], 25);
    }

    #[test]
    fn paired_stats_reconcile_independently_without_clamping() {
        let cfg = config(&[("STR", 3.0)], "1");
        let mut record = CharacterRecord::new();
        let open = NumericSchema::integer();
        // current above its paired maximum: sync must not clamp
        record.set_combat_stat("health", 50.0, &open, None).expect("set");
        record.set_combat_stat("health_max", 20.0, &open, None).expect("set");

        let synced = sync(&record, &cfg);
        assert_eq!(synced.combat_stat("health"), Some(50.0));
        assert_eq!(synced.combat_stat("health_max"), Some(20.0));
    }

    #[test]
    fn declared_text_default_wins_over_empty() {
        let mut cfg = config(&[("STR", 3.0)], "1");
        // Rebuild with a text default by resolving a modified info document
        let mut info = cfg.character_info().clone();
        info.fields[0] = InfoFieldDefinition::Text {
            id: "name".to_string(),
            label: "Name".to_string(),
            placeholder: None,
            required: true,
            default: Some("Unnamed".to_string()),
        };
        cfg = ResolvedConfiguration::resolve(
            cfg.enums().clone(),
            cfg.attributes().clone(),
            info,
            cfg.combat_stats().clone(),
            cfg.inventory().clone(),
            cfg.level_class().clone(),
        )
        .expect("still consistent");

        let synced = sync(&CharacterRecord::new(), &cfg);
        assert_eq!(synced.character_info()["name"], "Unnamed");
    }
}
