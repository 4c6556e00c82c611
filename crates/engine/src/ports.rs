//! Outbound ports
//!
//! The engine depends only on "given a document kind, retrieve raw JSON text
//! or fail"; transport is an adapter concern (see [`crate::sources`]).

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// The six configuration document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Enums,
    Attributes,
    CharacterInfo,
    CombatStats,
    Inventory,
    LevelClass,
}

impl DocumentKind {
    /// All kinds in load order.
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Enums,
        DocumentKind::Attributes,
        DocumentKind::CharacterInfo,
        DocumentKind::CombatStats,
        DocumentKind::Inventory,
        DocumentKind::LevelClass,
    ];

    /// Well-known fetch name (the `<name>.json` part of a document path).
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Enums => "enums",
            Self::Attributes => "attributes",
            Self::CharacterInfo => "character-info",
            Self::CombatStats => "combat-stats",
            Self::Inventory => "inventory",
            Self::LevelClass => "level-class",
        }
    }

    /// Document label used in validation reports.
    pub fn document_label(&self) -> &'static str {
        match self {
            Self::Enums => "enums",
            Self::Attributes => "attributes",
            Self::CharacterInfo => "characterInfo",
            Self::CombatStats => "combatStats",
            Self::Inventory => "inventory",
            Self::LevelClass => "levelClass",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_label())
    }
}

/// Error retrieving a document's raw text.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("document '{0}' not found")]
    NotFound(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Retrieval boundary for configuration documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieve the raw JSON text of one document.
    async fn fetch(&self, kind: DocumentKind) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_names_are_the_well_known_paths() {
        let names: Vec<&str> = DocumentKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "enums",
                "attributes",
                "character-info",
                "combat-stats",
                "inventory",
                "level-class"
            ]
        );
    }

    #[test]
    fn labels_match_validation_report_documents() {
        assert_eq!(DocumentKind::CharacterInfo.to_string(), "characterInfo");
        assert_eq!(DocumentKind::CombatStats.to_string(), "combatStats");
    }
}
