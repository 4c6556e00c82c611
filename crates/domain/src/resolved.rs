//! Cross-document resolution
//!
//! Individual documents only know their own invariants. This module checks
//! the relationships between them - every `enumRef` must name a loaded
//! enumeration, and the union of ids across enumerations, attributes, info
//! fields, combat stats (pairs flattened), and inventory tabs must be
//! collision-free, because those ids are used interchangeably as lookup keys
//! in the resolved configuration and in character records.
//!
//! [`ResolvedConfiguration`] can only be built through [`ResolvedConfiguration::resolve`],
//! so holding one is proof the whole configuration is consistent.

use std::collections::HashMap;

use crate::documents::{
    attributes, combat, enums, info, inventory, level, AttributesDocument, CharacterInfoDocument,
    CombatStatEntry, CombatStatsDocument, EnumDefinition, EnumsDocument, InventoryDocument,
    LevelClassDocument,
};
use crate::validation::ValidationError;

/// Unresolved `enumRef` errors for every document pair that loaded.
///
/// Only runnable when the enumeration catalog itself validated; callers skip
/// this check otherwise. Documents that failed their own validation are
/// passed as `None` - their references are not trustworthy.
pub fn cross_reference_errors(
    enums: &EnumsDocument,
    character_info: Option<&CharacterInfoDocument>,
    inventory: Option<&InventoryDocument>,
    level_class: Option<&LevelClassDocument>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(doc) = character_info {
        for (i, field) in doc.fields.iter().enumerate() {
            if let Some(enum_ref) = field.enum_ref() {
                if enums.get(enum_ref).is_none() {
                    errors.push(ValidationError::new(
                        info::DOCUMENT,
                        format!("fields.{}.enumRef", i),
                        format!("referenced enum '{}' not found", enum_ref),
                    ));
                }
            }
        }
    }
    if let Some(doc) = inventory {
        for (i, tab) in doc.tabs.iter().enumerate() {
            if enums.get(&tab.enum_ref).is_none() {
                errors.push(ValidationError::new(
                    inventory::DOCUMENT,
                    format!("tabs.{}.enumRef", i),
                    format!("referenced enum '{}' not found", tab.enum_ref),
                ));
            }
        }
    }
    if let Some(doc) = level_class {
        if enums.get(&doc.enum_ref).is_none() {
            errors.push(ValidationError::new(
                level::DOCUMENT,
                "enumRef",
                format!("referenced enum '{}' not found", doc.enum_ref),
            ));
        }
    }
    errors
}

/// Id collisions across documents, each reported with the offending location
/// and the first location that claimed the id.
///
/// Documents that failed their own validation are passed as `None` and
/// excluded - their ids are not trustworthy.
pub fn global_uniqueness_errors(
    enums: Option<&EnumsDocument>,
    attributes: Option<&AttributesDocument>,
    character_info: Option<&CharacterInfoDocument>,
    combat_stats: Option<&CombatStatsDocument>,
    inventory: Option<&InventoryDocument>,
) -> Vec<ValidationError> {
    let mut claims: Vec<(&str, String, &str)> = Vec::new();
    if let Some(doc) = enums {
        for (i, def) in doc.enums.iter().enumerate() {
            claims.push((enums::DOCUMENT, format!("enums.{}.id", i), def.id.as_str()));
        }
    }
    if let Some(doc) = attributes {
        for (i, def) in doc.attributes.iter().enumerate() {
            claims.push((attributes::DOCUMENT, format!("attributes.{}.id", i), def.id.as_str()));
        }
    }
    if let Some(doc) = character_info {
        for (i, field) in doc.fields.iter().enumerate() {
            claims.push((info::DOCUMENT, format!("fields.{}.id", i), field.id()));
        }
    }
    if let Some(doc) = combat_stats {
        for (i, entry) in doc.stats.iter().enumerate() {
            match entry {
                CombatStatEntry::Single(def) => {
                    claims.push((combat::DOCUMENT, format!("stats.{}.id", i), def.id.as_str()));
                }
                CombatStatEntry::Paired(current, maximum) => {
                    claims.push((combat::DOCUMENT, format!("stats.{}.0.id", i), current.id.as_str()));
                    claims.push((combat::DOCUMENT, format!("stats.{}.1.id", i), maximum.id.as_str()));
                }
            }
        }
    }
    if let Some(doc) = inventory {
        for (i, tab) in doc.tabs.iter().enumerate() {
            claims.push((inventory::DOCUMENT, format!("tabs.{}.id", i), tab.id.as_str()));
        }
    }

    let mut first_claim: HashMap<&str, (&str, String)> = HashMap::new();
    let mut errors = Vec::new();
    for (document, path, id) in claims {
        match first_claim.get(id) {
            Some((first_document, first_path)) => {
                errors.push(ValidationError::new(
                    document,
                    path,
                    format!(
                        "duplicate id '{}' across documents (first claimed by {} at {})",
                        id, first_document, first_path
                    ),
                ));
            }
            None => {
                first_claim.insert(id, (document, path));
            }
        }
    }
    errors
}

/// The validated, cross-checked union of all six documents for one load
/// generation. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    enums: EnumsDocument,
    attributes: AttributesDocument,
    character_info: CharacterInfoDocument,
    combat_stats: CombatStatsDocument,
    inventory: InventoryDocument,
    level_class: LevelClassDocument,
    /// enum id -> index into `enums.enums`
    enum_index: HashMap<String, usize>,
}

impl ResolvedConfiguration {
    /// Validate all six documents, resolve cross-references, and check global
    /// id uniqueness. Every problem is accumulated; the configuration is
    /// produced only when the error list would be empty.
    pub fn resolve(
        enums: EnumsDocument,
        attributes: AttributesDocument,
        character_info: CharacterInfoDocument,
        combat_stats: CombatStatsDocument,
        inventory: InventoryDocument,
        level_class: LevelClassDocument,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let enums_valid = collect(enums.validate(), &mut errors);
        let attributes_valid = collect(attributes.validate(), &mut errors);
        let info_valid = collect(character_info.validate(), &mut errors);
        let stats_valid = collect(combat_stats.validate(), &mut errors);
        let inventory_valid = collect(inventory.validate(), &mut errors);
        let level_valid = collect(level_class.validate(), &mut errors);

        if enums_valid {
            errors.extend(cross_reference_errors(
                &enums,
                info_valid.then_some(&character_info),
                inventory_valid.then_some(&inventory),
                level_valid.then_some(&level_class),
            ));
        }
        errors.extend(global_uniqueness_errors(
            enums_valid.then_some(&enums),
            attributes_valid.then_some(&attributes),
            info_valid.then_some(&character_info),
            stats_valid.then_some(&combat_stats),
            inventory_valid.then_some(&inventory),
        ));

        if !errors.is_empty() {
            return Err(errors);
        }

        let enum_index = enums
            .enums
            .iter()
            .enumerate()
            .map(|(i, def)| (def.id.clone(), i))
            .collect();
        Ok(Self {
            enums,
            attributes,
            character_info,
            combat_stats,
            inventory,
            level_class,
            enum_index,
        })
    }

    // ──────────────────────────────────────────────────────────────────────
    // Read accessors
    // ──────────────────────────────────────────────────────────────────────

    pub fn enums(&self) -> &EnumsDocument {
        &self.enums
    }

    pub fn attributes(&self) -> &AttributesDocument {
        &self.attributes
    }

    pub fn character_info(&self) -> &CharacterInfoDocument {
        &self.character_info
    }

    pub fn combat_stats(&self) -> &CombatStatsDocument {
        &self.combat_stats
    }

    pub fn inventory(&self) -> &InventoryDocument {
        &self.inventory
    }

    pub fn level_class(&self) -> &LevelClassDocument {
        &self.level_class
    }

    /// Look up an enumeration through the derived index.
    pub fn get_enum(&self, id: &str) -> Option<&EnumDefinition> {
        self.enum_index.get(id).and_then(|&i| self.enums.enums.get(i))
    }
}

fn collect(result: Result<(), Vec<ValidationError>>, errors: &mut Vec<ValidationError>) -> bool {
    match result {
        Ok(()) => true,
        Err(mut list) => {
            errors.append(&mut list);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{
        AttributeDefinition, CombatStatDefinition, EnumValue, InfoFieldDefinition,
        InventoryTabDefinition, LevelBounds,
    };
    use crate::numeric::NumericSchema;

    fn enum_def(id: &str, values: &[&str]) -> EnumDefinition {
        EnumDefinition {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: None,
            values: values.iter().map(|v| EnumValue::Plain(v.to_string())).collect(),
        }
    }

    fn enums_doc() -> EnumsDocument {
        EnumsDocument {
            enums: vec![
                enum_def("species", &["Human", "Elf"]),
                enum_def("classes", &["Warrior", "Mage"]),
                enum_def("items", &["Sword", "Potion"]),
            ],
        }
    }

    fn attributes_doc() -> AttributesDocument {
        AttributesDocument {
            title: "Attributes".to_string(),
            attributes: vec![AttributeDefinition {
                id: "STR".to_string(),
                label: "Strength".to_string(),
                description: "Raw power".to_string(),
                emoji: None,
                color: None,
                schema: NumericSchema::integer().with_minimum(1.0).with_maximum(20.0),
            }],
        }
    }

    fn info_doc(species_field_id: &str) -> CharacterInfoDocument {
        CharacterInfoDocument {
            title: "Character Info".to_string(),
            fields: vec![InfoFieldDefinition::Enum {
                id: species_field_id.to_string(),
                label: "Species".to_string(),
                enum_ref: "species".to_string(),
                required: true,
                default: None,
            }],
        }
    }

    fn stats_doc() -> CombatStatsDocument {
        CombatStatsDocument {
            title: "Combat".to_string(),
            stats: vec![CombatStatEntry::Paired(
                CombatStatDefinition {
                    id: "health".to_string(),
                    label: "HP".to_string(),
                    description: "Current health".to_string(),
                    emoji: None,
                    color: None,
                    schema: NumericSchema::integer().with_minimum(0.0).with_dynamic_maximum(),
                },
                CombatStatDefinition {
                    id: "health_max".to_string(),
                    label: "Max HP".to_string(),
                    description: "Maximum health".to_string(),
                    emoji: None,
                    color: None,
                    schema: NumericSchema::integer().with_minimum(1.0).with_maximum(999.0),
                },
            )],
        }
    }

    fn inventory_doc() -> InventoryDocument {
        InventoryDocument {
            title: "Inventory".to_string(),
            tabs: vec![InventoryTabDefinition {
                id: "backpack".to_string(),
                label: "Backpack".to_string(),
                enum_ref: "items".to_string(),
                slot_formula: "STR * 2".to_string(),
                empty_message: "Empty".to_string(),
            }],
        }
    }

    fn level_doc() -> LevelClassDocument {
        LevelClassDocument {
            enum_ref: "classes".to_string(),
            levels: LevelBounds {
                min: 1,
                default: 1,
                max: 20,
            },
            class_label: "Class".to_string(),
            level_label: "Level".to_string(),
        }
    }

    fn resolve_all(
        enums: EnumsDocument,
        info: CharacterInfoDocument,
    ) -> Result<ResolvedConfiguration, Vec<ValidationError>> {
        ResolvedConfiguration::resolve(
            enums,
            attributes_doc(),
            info,
            stats_doc(),
            inventory_doc(),
            level_doc(),
        )
    }

    #[test]
    fn consistent_documents_resolve() {
        let config = resolve_all(enums_doc(), info_doc("char_species")).expect("consistent");
        assert_eq!(
            config.get_enum("species").and_then(|e| e.first_value_name()),
            Some("Human")
        );
        assert!(config.get_enum("missing").is_none());
    }

    #[test]
    fn unresolved_enum_reference_fails() {
        let mut info = info_doc("char_species");
        info.fields = vec![InfoFieldDefinition::Enum {
            id: "char_species".to_string(),
            label: "Species".to_string(),
            enum_ref: "speciez".to_string(),
            required: false,
            default: None,
        }];
        let errors = resolve_all(enums_doc(), info).expect_err("dangling reference");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, "characterInfo");
        assert_eq!(errors[0].path, "fields.0.enumRef");
        assert_eq!(errors[0].message, "referenced enum 'speciez' not found");
    }

    #[test]
    fn id_collision_across_documents_names_both_locations() {
        // The species enumeration and an info field both claim "species".
        let errors = resolve_all(enums_doc(), info_doc("species")).expect_err("collision");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, "characterInfo");
        assert_eq!(errors[0].path, "fields.0.id");
        assert!(errors[0].message.contains("enums"));
        assert!(errors[0].message.contains("enums.0.id"));
    }

    #[test]
    fn renaming_the_colliding_id_resolves() {
        assert!(resolve_all(enums_doc(), info_doc("species")).is_err());
        let config = resolve_all(enums_doc(), info_doc("character_species")).expect("fixed");
        let species = config.get_enum("species").expect("species enum");
        assert_eq!(
            species.values.iter().map(|v| v.name()).collect::<Vec<_>>(),
            vec!["Human", "Elf"]
        );
    }

    #[test]
    fn invalid_document_excluded_from_global_uniqueness() {
        // The info document is invalid (empty field list), so its ids are
        // not trusted; only its own validation error is reported.
        let info = CharacterInfoDocument {
            title: "Character Info".to_string(),
            fields: vec![],
        };
        let errors = resolve_all(enums_doc(), info).expect_err("invalid info");
        assert!(errors.iter().all(|e| e.document == "characterInfo"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn errors_accumulate_across_documents() {
        let mut enums = enums_doc();
        enums.enums[0].values.clear(); // empty values list
        let mut info = info_doc("char_species");
        info.title = String::new(); // blank title
        let errors = resolve_all(enums, info).expect_err("two documents broken");
        assert!(errors.iter().any(|e| e.document == "enums"));
        assert!(errors.iter().any(|e| e.document == "characterInfo"));
    }

    #[test]
    fn paired_stat_ids_participate_in_uniqueness() {
        let mut enums = enums_doc();
        enums.enums.push(enum_def("health", &["x"]));
        let errors = resolve_all(enums, info_doc("char_species")).expect_err("collision");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, "combatStats");
        assert_eq!(errors[0].path, "stats.0.0.id");
        assert!(errors[0].message.contains("enums.3.id"));
    }
}
