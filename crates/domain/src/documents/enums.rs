//! Enumeration catalog document
//!
//! Enumerations are the option lists the rest of the configuration refers to
//! by id: species pickers, item catalogs, class lists. A value is either a
//! bare name or an object carrying a description and an open-ended data
//! payload (e.g., a class archetype with its hit die).

use serde::{Deserialize, Serialize};

use crate::validation::{find_duplicates, ValidationError};

/// Document label used in validation reports.
pub const DOCUMENT: &str = "enums";

/// A described enumeration value with optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribedValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Open-ended payload, opaque to the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// One enumeration value: a bare name or a described object.
///
/// All uniqueness and lookup goes through [`EnumValue::name`] so the two
/// forms never need separate handling at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Plain(String),
    Described(DescribedValue),
}

impl EnumValue {
    /// The value's name, regardless of form.
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Described(value) => &value.name,
        }
    }

    /// The value's description, if the described form carries one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Described(value) => value.description.as_deref(),
        }
    }

    /// The open-ended payload, if any.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Plain(_) => None,
            Self::Described(value) => value.data.as_ref(),
        }
    }
}

/// A named, ordered list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    /// Unique id, global namespace
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumDefinition {
    /// Name of the first value; the synchronizer's padding default.
    pub fn first_value_name(&self) -> Option<&str> {
        self.values.first().map(EnumValue::name)
    }
}

/// The enumeration catalog: every enumeration the configuration defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumsDocument {
    pub enums: Vec<EnumDefinition>,
}

impl EnumsDocument {
    /// Look up an enumeration by id.
    pub fn get(&self, id: &str) -> Option<&EnumDefinition> {
        self.enums.iter().find(|def| def.id == id)
    }

    /// Intra-document invariants: non-empty ids/labels/value lists, unique
    /// ids, and unique value names within each enumeration.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        for (i, def) in self.enums.iter().enumerate() {
            if def.id.trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("enums.{}.id", i),
                    "id must not be empty",
                ));
            }
            if def.label.trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("enums.{}.label", i),
                    "label must not be empty",
                ));
            }
            if def.values.is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("enums.{}.values", i),
                    "values must not be empty",
                ));
            }
            for (path, name, first) in find_duplicates(
                def.values
                    .iter()
                    .enumerate()
                    .map(|(j, value)| (format!("enums.{}.values.{}", i, j), value.name())),
            ) {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    path,
                    format!("duplicate value name '{}' (first defined at {})", name, first),
                ));
            }
        }
        for (path, id, first) in find_duplicates(
            self.enums
                .iter()
                .enumerate()
                .map(|(i, def)| (format!("enums.{}.id", i), def.id.as_str())),
        ) {
            errors.push(ValidationError::new(
                DOCUMENT,
                path,
                format!("duplicate enum id '{}' (first defined at {})", id, first),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
