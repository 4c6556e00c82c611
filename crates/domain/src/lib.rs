//! Sheetsmith Domain - configuration documents, validation, and record
//! synchronization.
//!
//! Pure layer: no I/O, no async. The engine crate owns document fetching
//! and the load lifecycle; everything here is deterministic data and rules.

pub mod documents;
pub mod error;
pub mod formula;
pub mod numeric;
pub mod record;
pub mod resolved;
pub mod sync;
pub mod validation;

pub use error::DomainError;

// Re-export document types (explicit list in documents/mod.rs)
pub use documents::{
    AttributeDefinition, AttributesDocument, CharacterInfoDocument, CombatStatDefinition,
    CombatStatEntry, CombatStatsDocument, DescribedValue, EnumDefinition, EnumValue,
    EnumsDocument, InfoFieldDefinition, InventoryDocument, InventoryTabDefinition, LevelBounds,
    LevelClassDocument,
};

// Re-export numeric schema types
pub use numeric::{Bounds, DynamicMarker, MaximumBound, NumericSchema, ValueType};

// Re-export formula evaluation
pub use formula::{evaluate, try_evaluate, FormulaError};

// Re-export resolution types
pub use resolved::{cross_reference_errors, global_uniqueness_errors, ResolvedConfiguration};

// Re-export record and synchronization
pub use record::{CharacterRecord, LevelSelection, RECORD_VERSION};
pub use sync::{needs_sync, sync};

// Re-export validation reporting
pub use validation::{format_errors, ValidationError};
