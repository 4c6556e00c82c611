//! Character-info document
//!
//! Informational fields on the sheet: free text (name, backstory) or a pick
//! from an enumeration (species). The `type` tag discriminates the two
//! forms on the wire.

use serde::{Deserialize, Serialize};

use crate::validation::{find_duplicates, ValidationError};

/// Document label used in validation reports.
pub const DOCUMENT: &str = "characterInfo";

/// One info field: free text or an enumeration pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InfoFieldDefinition {
    #[serde(rename_all = "camelCase")]
    Text {
        /// Unique id, global namespace
        id: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default)]
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Enum {
        /// Unique id, global namespace
        id: String,
        label: String,
        /// Id of the enumeration supplying the options
        enum_ref: String,
        #[serde(default)]
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

impl InfoFieldDefinition {
    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. } | Self::Enum { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Text { label, .. } | Self::Enum { label, .. } => label,
        }
    }

    /// The referenced enumeration id, for enum fields.
    pub fn enum_ref(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::Enum { enum_ref, .. } => Some(enum_ref),
        }
    }

    /// The declared default value, if any.
    pub fn default_value(&self) -> Option<&str> {
        match self {
            Self::Text { default, .. } | Self::Enum { default, .. } => default.as_deref(),
        }
    }
}

/// The character-info configuration: title plus a non-empty field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInfoDocument {
    pub title: String,
    pub fields: Vec<InfoFieldDefinition>,
}

impl CharacterInfoDocument {
    /// Look up a field by id.
    pub fn get(&self, id: &str) -> Option<&InfoFieldDefinition> {
        self.fields.iter().find(|field| field.id() == id)
    }

    /// Intra-document invariants. Cross-document existence of `enumRef`
    /// targets is checked at resolution time, not here.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "title", "title must not be empty"));
        }
        if self.fields.is_empty() {
            errors.push(ValidationError::new(DOCUMENT, "fields", "fields must not be empty"));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.id().trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("fields.{}.id", i),
                    "id must not be empty",
                ));
            }
            if field.label().trim().is_empty() {
                errors.push(ValidationError::new(
                    DOCUMENT,
                    format!("fields.{}.label", i),
                    "label must not be empty",
                ));
            }
            if let Some(enum_ref) = field.enum_ref() {
                if enum_ref.trim().is_empty() {
                    errors.push(ValidationError::new(
                        DOCUMENT,
                        format!("fields.{}.enumRef", i),
                        "enumRef must not be empty",
                    ));
                }
            }
        }
        for (path, id, first) in find_duplicates(
            self.fields
                .iter()
                .enumerate()
                .map(|(i, field)| (format!("fields.{}.id", i), field.id())),
        ) {
            errors.push(ValidationError::new(
                DOCUMENT,
                path,
                format!("duplicate field id '{}' (first defined at {})", id, first),
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

    fn text_field(id: &str) -> InfoFieldDefinition {
        InfoFieldDefinition::Text {
            id: id.to_string(),
            label: id.to_uppercase(),
            placeholder: None,
            required: false,
            default: None,
        }
    }

    fn enum_field(id: &str, enum_ref: &str) -> InfoFieldDefinition {
        InfoFieldDefinition::Enum {
            id: id.to_string(),
            label: id.to_uppercase(),
            enum_ref: enum_ref.to_string(),
            required: true,
            default: None,
        }
    }

    fn document(fields: Vec<InfoFieldDefinition>) -> CharacterInfoDocument {
        CharacterInfoDocument {
            title: "Character Info".to_string(),
            fields,
        }
    }

    #[test]
    fn discriminated_union_deserializes_by_type_tag() {
        let json = r#"{
            "title": "Character Info",
            "fields": [
                {"type": "text", "id": "name", "label": "Name", "placeholder": "Enter a name", "required": true},
                {"type": "enum", "id": "char_species", "label": "Species", "enumRef": "species"}
            ]
        }"#;
        let doc: CharacterInfoDocument = serde_json::from_str(json).expect("valid document");
        assert_eq!(doc.fields[0].enum_ref(), None);
        assert_eq!(doc.fields[1].enum_ref(), Some("species"));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn unknown_type_tag_rejected() {
        let json = r#"{"type": "number", "id": "age", "label": "Age"}"#;
        assert!(serde_json::from_str::<InfoFieldDefinition>(json).is_err());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let doc = document(vec![text_field("name"), enum_field("name", "species")]);
        let errors = doc.validate().expect_err("duplicate id");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "fields.1.id");
    }

    #[test]
    fn empty_fields_list_rejected() {
        assert!(document(vec![]).validate().is_err());
    }

    #[test]
    fn blank_enum_ref_rejected() {
        let doc = document(vec![enum_field("char_species", " ")]);
        let errors = doc.validate().expect_err("blank enumRef");
        assert_eq!(errors[0].path, "fields.0.enumRef");
    }
}
