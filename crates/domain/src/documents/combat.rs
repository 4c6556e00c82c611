//! Combat stats document
//!
//! Combat stats are numeric like attributes, but may come as a paired
//! `(current, maximum)` 2-tuple modeling quantities such as health: the
//! current value is capped by the maximum's live value (a dynamic bound),
//! and the maximum itself stays user-editable under a concrete bound.

use serde::{Deserialize, Serialize};

use crate::numeric::NumericSchema;
use crate::validation::{find_duplicates, ValidationError};

/// Document label used in validation reports.
pub const DOCUMENT: &str = "combatStats";

/// One combat stat: identity, display hints, and its numeric schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStatDefinition {
    /// Unique id, global namespace
    pub id: String,
    pub label: String,
    pub description: String,
    /// Display hint, opaque to the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Display hint, opaque to the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub schema: NumericSchema,
}

/// A single stat, or a `(current, maximum)` pair (JSON: a 2-element array).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CombatStatEntry {
    Paired(CombatStatDefinition, CombatStatDefinition),
    Single(CombatStatDefinition),
}

impl CombatStatEntry {
    pub fn is_paired(&self) -> bool {
        matches!(self, Self::Paired(_, _))
    }

    /// The entry's definitions in order; a pair yields current then maximum.
    pub fn definition_list(&self) -> Vec<&CombatStatDefinition> {
        match self {
            Self::Single(def) => vec![def],
            Self::Paired(current, maximum) => vec![current, maximum],
        }
    }

    /// For a pair, the paired maximum definition for a given current id.
    pub fn paired_maximum_for(&self, current_id: &str) -> Option<&CombatStatDefinition> {
        match self {
            Self::Paired(current, maximum) if current.id == current_id => Some(maximum),
            _ => None,
        }
    }
}

/// The combat-stats configuration: title plus a non-empty list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStatsDocument {
    pub title: String,
    pub stats: Vec<CombatStatEntry>,
}

impl CombatStatsDocument {
    /// All stat definitions with pairs flattened, in document order.
    pub fn flattened(&self) -> impl Iterator<Item = &CombatStatDefinition> {
        self.stats.iter().flat_map(|entry| entry.definition_list())
    }

    /// Look up a stat definition by id, searching into pairs.
    pub fn get(&self, id: &str) -> Option<&CombatStatDefinition> {
        self.flattened().find(|def| def.id == id)
    }

    /// For a current-of-pair id, the paired maximum definition.
    pub fn paired_maximum_for(&self, current_id: &str) -> Option<&CombatStatDefinition> {
        self.stats
            .iter()
            .find_map(|entry| entry.paired_maximum_for(current_id))
    }

    /// Intra-document invariants, including the paired-stat rule: a dynamic
    /// current requires a concrete numeric paired maximum.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "title", "title must not be empty"));
        }
        if self.stats.is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "stats", "stats must not be empty"));
        }
        for (i, entry) in self.stats.iter().enumerate() {
            match entry {
                CombatStatEntry::Single(def) => {
                    Self::check_definition(def, &format!("stats.{}", i), &mut errors);
                }
                CombatStatEntry::Paired(current, maximum) => {
                    Self::check_definition(current, &format!("stats.{}.0", i), &mut errors);
                    Self::check_definition(maximum, &format!("stats.{}.1", i), &mut errors);
                    if current.schema.has_dynamic_maximum()
                        && maximum.schema.maximum.and_then(|m| m.as_value()).is_none()
                    {
                        errors.push(ValidationError::new(
                            DOCUMENT,
                            format!("stats.{}.1.schema.maximum", i),
                            format!(
                                "paired maximum for '{}' must have a concrete numeric maximum",
                                current.id
                            ),
                        ));
                    }
                }
            }
        }
        let paths_and_ids: Vec<(String, &str)> = self
            .stats
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| match entry {
                CombatStatEntry::Single(def) => {
                    vec![(format!("stats.{}.id", i), def.id.as_str())]
                }
                CombatStatEntry::Paired(current, maximum) => vec![
                    (format!("stats.{}.0.id", i), current.id.as_str()),
                    (format!("stats.{}.1.id", i), maximum.id.as_str()),
                ],
            })
            .collect();
        for (path, id, first) in find_duplicates(paths_and_ids) {
            errors.push(ValidationError::new(
                DOCUMENT,
                path,
                format!("duplicate stat id '{}' (first defined at {})", id, first),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_definition(def: &CombatStatDefinition, path: &str, errors: &mut Vec<ValidationError>) {
        if def.id.trim().is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                format!("{}.id", path),
                "id must not be empty",
            ));
        }
        if def.label.trim().is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                format!("{}.label", path),
                "label must not be empty",
            ));
        }
        errors.extend(def.schema.check_invariants(DOCUMENT, &format!("{}.schema", path)));
    }
}
