//! Accumulated validation diagnostics
//!
//! Every configuration problem - structural, cross-reference, or uniqueness -
//! is reported as a [`ValidationError`] carrying the document name, a dotted
//! path into that document, and a human-readable message. Loading never
//! short-circuits on the first problem: callers collect the full list so a
//! user sees everything wrong with their documents at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single validation problem located inside one configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Document the problem was found in (e.g., "attributes", "characterInfo")
    pub document: String,
    /// Dotted path to the offending element ("tabs.2.slotFormula"); empty for
    /// document-level problems such as fetch or parse failures
    pub path: String,
    /// Human-readable description of the problem
    pub message: String,
}

impl ValidationError {
    pub fn new(
        document: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} at {}] {}", self.document, self.path, self.message)
    }
}

/// Render a list of validation errors as diagnostic text.
///
/// One `[<document> at <path>] <message>` line per error, or `No errors` for
/// an empty list. Callers display this text verbatim, so the format is part
/// of the contract.
pub fn format_errors(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "No errors".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find duplicate ids in an ordered sequence of `(path, id)` pairs.
///
/// Returns one entry per repeated occurrence: the offending path, the id, and
/// the path of the first claim. Document validators use this so a duplicate
/// report always names both locations.
pub(crate) fn find_duplicates<'a>(
    entries: impl IntoIterator<Item = (String, &'a str)>,
) -> Vec<(String, &'a str, String)> {
    let mut first_claim: std::collections::HashMap<&str, String> = std::collections::HashMap::new();
    let mut duplicates = Vec::new();
    for (path, id) in entries {
        match first_claim.get(id) {
            Some(first) => duplicates.push((path, id, first.clone())),
            None => {
                first_claim.insert(id, path);
            }
        }
    }
    duplicates
}
