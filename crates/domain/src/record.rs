//! Character record - the mutable entity reconciled against configuration
//!
//! Per-category fields are open maps of "whatever the current configuration
//! defines", not fixed structs: the configuration can change shape at any
//! time and the synchronizer reshapes records to match. All mutation goes
//! through validated setters so a record is never partially invalid - a
//! mutation either fully succeeds or is rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::DomainError;
use crate::numeric::NumericSchema;

/// Serialization format version for persisted records.
pub const RECORD_VERSION: u32 = 1;

/// Class and level selection; independent of synchronization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSelection {
    /// Name of the chosen class (a value of the class-catalog enumeration)
    pub class_name: String,
    pub value: i32,
}

/// A character: open per-category maps shaped by the active configuration,
/// plus fields the synchronizer never touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    version: u32,
    /// attribute id -> value
    attributes: HashMap<String, f64>,
    /// combat stat id (pairs flattened) -> value
    combat_stats: HashMap<String, f64>,
    /// info field id -> value
    character_info: HashMap<String, String>,
    /// inventory tab id -> ordered item names
    inventory_slots: HashMap<String, Vec<String>>,
    /// Untouched by synchronization
    level: LevelSelection,
    /// Untouched by synchronization
    resource_counters: HashMap<String, i64>,
}

impl CharacterRecord {
    /// A fresh, empty record at the current version.
    pub fn new() -> Self {
        Self {
            version: RECORD_VERSION,
            attributes: HashMap::new(),
            combat_stats: HashMap::new(),
            character_info: HashMap::new(),
            inventory_slots: HashMap::new(),
            level: LevelSelection::default(),
            resource_counters: HashMap::new(),
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Read accessors
    // ──────────────────────────────────────────────────────────────────────

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn attributes(&self) -> &HashMap<String, f64> {
        &self.attributes
    }

    pub fn combat_stats(&self) -> &HashMap<String, f64> {
        &self.combat_stats
    }

    pub fn character_info(&self) -> &HashMap<String, String> {
        &self.character_info
    }

    pub fn inventory_slots(&self) -> &HashMap<String, Vec<String>> {
        &self.inventory_slots
    }

    pub fn level(&self) -> &LevelSelection {
        &self.level
    }

    pub fn resource_counters(&self) -> &HashMap<String, i64> {
        &self.resource_counters
    }

    pub fn attribute(&self, id: &str) -> Option<f64> {
        self.attributes.get(id).copied()
    }

    pub fn combat_stat(&self, id: &str) -> Option<f64> {
        self.combat_stats.get(id).copied()
    }

    // ──────────────────────────────────────────────────────────────────────
    // Validated mutation (all-or-nothing per call)
    // ──────────────────────────────────────────────────────────────────────

    /// Set an attribute after checking the candidate against its schema.
    pub fn set_attribute(
        &mut self,
        id: impl Into<String>,
        value: f64,
        schema: &NumericSchema,
    ) -> Result<(), DomainError> {
        let id = id.into();
        if !schema.accepts(value, None) {
            return Err(DomainError::constraint(format!(
                "value {} not permitted for attribute '{}'",
                value, id
            )));
        }
        self.attributes.insert(id, value);
        Ok(())
    }

    /// Set a combat stat; `dynamic_cap` is the paired maximum's live value
    /// for current-of-pair stats.
    pub fn set_combat_stat(
        &mut self,
        id: impl Into<String>,
        value: f64,
        schema: &NumericSchema,
        dynamic_cap: Option<f64>,
    ) -> Result<(), DomainError> {
        let id = id.into();
        if !schema.accepts(value, dynamic_cap) {
            return Err(DomainError::constraint(format!(
                "value {} not permitted for combat stat '{}'",
                value, id
            )));
        }
        self.combat_stats.insert(id, value);
        Ok(())
    }

    /// Clamp a current-of-pair stat to its (possibly reduced) maximum.
    ///
    /// Edit-time concern: invoked by callers after the paired maximum
    /// changes, never by the synchronizer.
    pub fn clamp_current_to_max(&mut self, current_id: &str, max_id: &str) {
        let cap = self.combat_stats.get(max_id).copied();
        if let (Some(cap), Some(current)) = (cap, self.combat_stats.get_mut(current_id)) {
            if *current > cap {
                *current = cap;
            }
        }
    }

    /// Set an info field value.
    pub fn set_info_field(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.character_info.insert(id.into(), value.into());
    }

    /// Put an item name into one slot of a tab; rejects out-of-range slots.
    pub fn set_inventory_slot(
        &mut self,
        tab_id: &str,
        slot: usize,
        item: impl Into<String>,
    ) -> Result<(), DomainError> {
        let slots = self
            .inventory_slots
            .get_mut(tab_id)
            .ok_or_else(|| DomainError::not_found("InventoryTab", tab_id))?;
        let slot_count = slots.len();
        let entry = slots.get_mut(slot).ok_or_else(|| {
            DomainError::constraint(format!(
                "slot {} out of range for tab '{}' ({} slots)",
                slot, tab_id, slot_count
            ))
        })?;
        *entry = item.into();
        Ok(())
    }

    /// Set the class/level selection.
    pub fn set_level(&mut self, class_name: impl Into<String>, value: i32) {
        self.level = LevelSelection {
            class_name: class_name.into(),
            value,
        };
    }

    /// Adjust a named resource counter, creating it at 0 if absent.
    pub fn adjust_resource_counter(&mut self, id: impl Into<String>, delta: i64) -> i64 {
        let counter = self.resource_counters.entry(id.into()).or_insert(0);
        *counter += delta;
        *counter
    }

    // ──────────────────────────────────────────────────────────────────────
    // Wholesale replacement (synchronizer and persistence only)
    // ──────────────────────────────────────────────────────────────────────

    pub(crate) fn replace_attributes(&mut self, attributes: HashMap<String, f64>) {
        self.attributes = attributes;
    }

    pub(crate) fn replace_combat_stats(&mut self, combat_stats: HashMap<String, f64>) {
        self.combat_stats = combat_stats;
    }

    pub(crate) fn replace_character_info(&mut self, character_info: HashMap<String, String>) {
        self.character_info = character_info;
    }

    pub(crate) fn replace_inventory_slots(&mut self, inventory_slots: HashMap<String, Vec<String>>) {
        self.inventory_slots = inventory_slots;
    }

    /// Rebuild from parts recovered by permissive deserialization.
    pub fn from_parts(
        version: u32,
        attributes: HashMap<String, f64>,
        combat_stats: HashMap<String, f64>,
        character_info: HashMap<String, String>,
        inventory_slots: HashMap<String, Vec<String>>,
        level: LevelSelection,
        resource_counters: HashMap<String, i64>,
    ) -> Self {
        Self {
            version,
            attributes,
            combat_stats,
            character_info,
            inventory_slots,
            level,
            resource_counters,
        }
    }
}

impl Default for CharacterRecord {
    fn default() -> Self {
        Self::new()
    }
}
