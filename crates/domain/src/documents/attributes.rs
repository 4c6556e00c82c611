//! Attribute document
//!
//! Attributes are the named numeric quantities a sheet renders as its core
//! stat grid (STR, DEX, ...). Inventory slot formulas draw their variables
//! from these ids.

use serde::{Deserialize, Serialize};

use crate::numeric::NumericSchema;
use crate::validation::{find_duplicates, ValidationError};

/// Document label used in validation reports.
pub const DOCUMENT: &str = "attributes";

/// One attribute: identity, display hints, and its numeric schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
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

/// The attributes configuration: title plus a non-empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributesDocument {
    pub title: String,
    pub attributes: Vec<AttributeDefinition>,
}

impl AttributesDocument {
    /// Look up an attribute by id.
    pub fn get(&self, id: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|def| def.id == id)
    }

    /// Intra-document invariants.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "title", "title must not be empty"));
        }
        if self.attributes.is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                "attributes",
                "attributes must not be empty",
            ));
        }
        for (i, def) in self.attributes.iter().enumerate() {
            if def.id.trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("attributes.{}.id", i),
                    "id must not be empty",
                ));
            }
            if def.label.trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("attributes.{}.label", i),
                    "label must not be empty",
                ));
            }
            errors.extend(
                def.schema
                    .check_invariants(DOCUMENT, &format!("attributes.{}.schema", i)),
            );
        }
        for (path, id, first) in find_duplicates(
            self.attributes
                .iter()
                .enumerate()
                .map(|(i, def)| (format!("attributes.{}.id", i), def.id.as_str())),
        ) {
            errors.push(ValidationError::new(
                DOCUMENT,
                path,
                format!("duplicate attribute id '{}' (first defined at {})", id, first),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
