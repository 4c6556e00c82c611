//! Engine-level error types

use sheetsmith_domain::ValidationError;
use thiserror::Error;

/// Errors from the configuration manager.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Precondition violation: a getter was called before a successful load
    #[error("configuration not loaded; await load_all first")]
    NotLoaded,

    /// An enum lookup missed in a loaded configuration
    #[error("enum '{0}' not found in resolved configuration")]
    EnumNotFound(String),

    /// The load completed but the documents are inconsistent
    #[error("configuration invalid: {} problem(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl ConfigError {
    /// The accumulated validation errors, if this is an invalid-load error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Errors from the record persistence boundary.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The payload is not JSON at all
    #[error("record text is not valid JSON: {0}")]
    Json(String),

    /// The payload is JSON but lacks the structurally required keys
    #[error("record is missing required keys: {0:?}")]
    MissingKeys(Vec<String>),
}
