//! Level/class rules document
//!
//! Points the sheet's class picker at an enumeration (the class catalog)
//! and bounds the level field.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Document label used in validation reports.
pub const DOCUMENT: &str = "levelClass";

/// Bounds for the level field: `min <= default <= max`, all positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBounds {
    pub min: i32,
    pub default: i32,
    pub max: i32,
}

/// The level/class configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelClassDocument {
    /// Id of the enumeration serving as the class catalog
    pub enum_ref: String,
    pub levels: LevelBounds,
    /// Display label for the class picker
    pub class_label: String,
    /// Display label for the level field
    pub level_label: String,
}

impl LevelClassDocument {
    /// Intra-document invariants.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.enum_ref.trim().is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                "enumRef",
                "enumRef must not be empty",
            ));
        }
        if self.class_label.trim().is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                "classLabel",
                "classLabel must not be empty",
            ));
        }
        if self.level_label.trim().is_empty() {
            errors.push(ValidationError::new(
                DOCUMENT,
                "levelLabel",
                "levelLabel must not be empty",
            ));
        }
        if self.levels.min < 1 {
            errors.push(ValidationError::new(
                DOCUMENT,
                "levels.min",
                format!("min must be a positive integer, got {}", self.levels.min),
            ));
        }
        if self.levels.min > self.levels.default || self.levels.default > self.levels.max {
            errors.push(ValidationError::new(
                DOCUMENT,
                "levels",
                format!(
                    "level bounds must satisfy min <= default <= max, got {} <= {} <= {}",
                    self.levels.min, self.levels.default, self.levels.max
                ),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> LevelClassDocument {
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

    #[test]
    fn valid_document_passes() {
        assert!(document().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut doc = document();
        doc.levels = LevelBounds {
            min: 5,
            default: 3,
            max: 20,
        };
        let errors = doc.validate().expect_err("default below min");
        assert_eq!(errors[0].path, "levels");
    }

    #[test]
    fn non_positive_min_rejected() {
        let mut doc = document();
        doc.levels = LevelBounds {
            min: 0,
            default: 1,
            max: 20,
        };
        let errors = doc.validate().expect_err("zero min");
        assert_eq!(errors[0].path, "levels.min");
    }

    #[test]
    fn blank_enum_ref_rejected() {
        let mut doc = document();
        doc.enum_ref = String::new();
        assert!(doc.validate().is_err());
    }
}
