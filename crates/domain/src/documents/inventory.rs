//! Inventory tabs document
//!
//! Each tab is a page of item slots: the item catalog comes from an
//! enumeration, and the slot count is derived from the character's
//! attributes through an arithmetic formula (see [`crate::formula`]).

use serde::{Deserialize, Serialize};

use crate::validation::{find_duplicates, ValidationError};

/// Document label used in validation reports.
pub const DOCUMENT: &str = "inventory";

/// One inventory tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTabDefinition {
    /// Unique id, global namespace
    pub id: String,
    pub label: String,
    /// Id of the enumeration serving as the item catalog
    pub enum_ref: String,
    /// Arithmetic expression over attribute ids yielding the slot count
    pub slot_formula: String,
    /// Shown when the tab has zero slots
    pub empty_message: String,
}

/// The inventory configuration: title plus a non-empty tab list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDocument {
    pub title: String,
    pub tabs: Vec<InventoryTabDefinition>,
}

impl InventoryDocument {
    /// Look up a tab by id.
    pub fn get(&self, id: &str) -> Option<&InventoryTabDefinition> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Intra-document invariants. Formula variables and `enumRef` targets
    /// are resolved later, against attributes and enumerations.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "title", "title must not be empty"));
        }
        if self.tabs.is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "tabs", "tabs must not be empty"));
        }
        for (i, tab) in self.tabs.iter().enumerate() {
            for (value, field) in [
                (&tab.id, "id"),
                (&tab.label, "label"),
                (&tab.enum_ref, "enumRef"),
                (&tab.slot_formula, "slotFormula"),
            ] {
                if value.trim().is_empty() {
                    errors.push(ValidationError::new(
                        DOCUMENT,
                        format!("tabs.{}.{}", i, field),
                        format!("{} must not be empty", field),
                    ));
                }
            }
        }
        for (path, id, first) in find_duplicates(
            self.tabs
                .iter()
                .enumerate()
                .map(|(i, tab)| (format!("tabs.{}.id", i), tab.id.as_str())),
        ) {
            errors.push(ValidationError::new(
                DOCUMENT,
                path,
                format!("duplicate tab id '{}' (first defined at {})", id, first),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
