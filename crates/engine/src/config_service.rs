//! Configuration manager
//!
//! Orchestrates one configuration "generation": fetch all six documents
//! through the [`DocumentSource`] port, validate each independently, run the
//! cross-document checks, and cache the resolved configuration.
//!
//! Loading is memoized and de-duplicated: concurrent `load_all` calls share
//! one in-flight load (multiple independently-mounted UI sections each
//! trigger a load on initialization), a successful result is cached until
//! [`ConfigService::reset`], and a failed load caches nothing so the next
//! call re-fetches.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use sheetsmith_domain::resolved::{cross_reference_errors, global_uniqueness_errors};
use sheetsmith_domain::{
    AttributesDocument, CharacterInfoDocument, CombatStatsDocument, EnumDefinition, EnumsDocument,
    InventoryDocument, LevelClassDocument, ResolvedConfiguration, ValidationError,
};

use crate::error::ConfigError;
use crate::ports::{DocumentKind, DocumentSource};

/// Lifecycle of the current configuration generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

type ConfigCell = OnceCell<Arc<ResolvedConfiguration>>;

/// The process-wide configuration cache, held explicitly by whatever owns
/// the UI tree rather than as hidden global state.
pub struct ConfigService {
    source: Arc<dyn DocumentSource>,
    /// Swapped out wholesale by `reset`; in-flight loads finish into the
    /// generation they started with.
    slot: Mutex<Arc<ConfigCell>>,
    state: Mutex<LoadState>,
}

impl ConfigService {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(Arc::new(OnceCell::new())),
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Current lifecycle state, for diagnostics and tests.
    pub fn state(&self) -> LoadState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LoadState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn current_cell(&self) -> Arc<ConfigCell> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load, validate, and cross-check all six documents.
    ///
    /// Idempotent and memoizing: after a success, returns the cached
    /// configuration without re-fetching; while a load is in flight,
    /// concurrent callers await the same operation. A failure returns the
    /// full accumulated error list and caches nothing.
    pub async fn load_all(&self) -> Result<Arc<ResolvedConfiguration>, ConfigError> {
        let cell = self.current_cell();
        let result = cell
            .get_or_try_init(|| async {
                self.set_state(LoadState::Loading);
                self.fetch_and_resolve().await.map(Arc::new)
            })
            .await;
        match result {
            Ok(config) => {
                self.set_state(LoadState::Loaded);
                Ok(config.clone())
            }
            Err(errors) => {
                self.set_state(LoadState::Failed);
                Err(ConfigError::Invalid(errors))
            }
        }
    }

    /// Drop the cached configuration so the next `load_all` re-fetches.
    ///
    /// Used for explicit "reload configuration" user actions and for test
    /// isolation; there is no automatic hot-reload.
    pub fn reset(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(OnceCell::new());
        self.set_state(LoadState::Unloaded);
        tracing::debug!("configuration cache reset");
    }

    /// The cached configuration; fails with [`ConfigError::NotLoaded`]
    /// before a successful load.
    pub fn get_configuration(&self) -> Result<Arc<ResolvedConfiguration>, ConfigError> {
        self.current_cell().get().cloned().ok_or(ConfigError::NotLoaded)
    }

    /// Enum lookup against the cached configuration; fails with
    /// [`ConfigError::NotLoaded`] before a successful load.
    pub fn get_enum(&self, id: &str) -> Result<EnumDefinition, ConfigError> {
        let config = self.get_configuration()?;
        config
            .get_enum(id)
            .cloned()
            .ok_or_else(|| ConfigError::EnumNotFound(id.to_string()))
    }

    /// One full load pass. Document failures are independent - every
    /// document is attempted so the caller sees all problems at once.
    async fn fetch_and_resolve(&self) -> Result<ResolvedConfiguration, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let enums: Option<EnumsDocument> =
            self.fetch_document(DocumentKind::Enums, &mut errors).await;
        let attributes: Option<AttributesDocument> = self
            .fetch_document(DocumentKind::Attributes, &mut errors)
            .await;
        let character_info: Option<CharacterInfoDocument> = self
            .fetch_document(DocumentKind::CharacterInfo, &mut errors)
            .await;
        let combat_stats: Option<CombatStatsDocument> = self
            .fetch_document(DocumentKind::CombatStats, &mut errors)
            .await;
        let inventory: Option<InventoryDocument> = self
            .fetch_document(DocumentKind::Inventory, &mut errors)
            .await;
        let level_class: Option<LevelClassDocument> = self
            .fetch_document(DocumentKind::LevelClass, &mut errors)
            .await;

        // Validate whatever parsed - failed documents drop out of the
        // cross checks, so the report stays as complete as possible.
        let enums_ok = validate_into(enums.as_ref(), &mut errors);
        let attributes_ok = validate_into(attributes.as_ref(), &mut errors);
        let info_ok = validate_into(character_info.as_ref(), &mut errors);
        let stats_ok = validate_into(combat_stats.as_ref(), &mut errors);
        let inventory_ok = validate_into(inventory.as_ref(), &mut errors);
        let level_ok = validate_into(level_class.as_ref(), &mut errors);

        if let Some(enums_doc) = valid_ref(enums.as_ref(), enums_ok) {
            errors.extend(cross_reference_errors(
                enums_doc,
                valid_ref(character_info.as_ref(), info_ok),
                valid_ref(inventory.as_ref(), inventory_ok),
                valid_ref(level_class.as_ref(), level_ok),
            ));
        }
        errors.extend(global_uniqueness_errors(
            valid_ref(enums.as_ref(), enums_ok),
            valid_ref(attributes.as_ref(), attributes_ok),
            valid_ref(character_info.as_ref(), info_ok),
            valid_ref(combat_stats.as_ref(), stats_ok),
            valid_ref(inventory.as_ref(), inventory_ok),
        ));

        if !errors.is_empty() {
            tracing::warn!(problems = errors.len(), "configuration load failed");
            return Err(errors);
        }

        match (enums, attributes, character_info, combat_stats, inventory, level_class) {
            (Some(e), Some(a), Some(ci), Some(cs), Some(inv), Some(lc)) => {
                // Re-runs the same checks; construction stays behind one door.
                let config = ResolvedConfiguration::resolve(e, a, ci, cs, inv, lc)?;
                tracing::info!("configuration loaded");
                Ok(config)
            }
            // A missing document always carries a fetch error, so this arm
            // cannot be reached with an empty error list.
            _ => Err(vec![ValidationError::new(
                "",
                "",
                "document set incomplete",
            )]),
        }
    }

    /// Fetch and parse one document; failures become document-level errors
    /// with empty path.
    async fn fetch_document<T: serde::de::DeserializeOwned>(
        &self,
        kind: DocumentKind,
        errors: &mut Vec<ValidationError>,
    ) -> Option<T> {
        let text = match self.source.fetch(kind).await {
            Ok(text) => text,
            Err(error) => {
                errors.push(ValidationError::new(
                    kind.document_label(),
                    "",
                    format!("fetch failed: {}", error),
                ));
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(document) => Some(document),
            Err(error) => {
                errors.push(ValidationError::new(
                    kind.document_label(),
                    "",
                    format!("invalid JSON: {}", error),
                ));
                None
            }
        }
    }
}

fn valid_ref<T>(document: Option<&T>, valid: bool) -> Option<&T> {
    if valid {
        document
    } else {
        None
    }
}

/// Run a document's own validation, appending its errors; true if valid.
fn validate_into<T: Validate>(document: Option<&T>, errors: &mut Vec<ValidationError>) -> bool {
    match document {
        Some(doc) => match doc.validate() {
            Ok(()) => true,
            Err(mut list) => {
                errors.append(&mut list);
                false
            }
        },
        None => false,
    }
}

/// Internal unification of the per-document `validate` methods.
trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

macro_rules! impl_validate {
    ($($ty:ty),* $(,)?) => {
        $(impl Validate for $ty {
            fn validate(&self) -> Result<(), Vec<ValidationError>> {
                <$ty>::validate(self)
            }
        })*
    };
}

impl_validate!(
    EnumsDocument,
    AttributesDocument,
    CharacterInfoDocument,
    CombatStatsDocument,
    InventoryDocument,
    LevelClassDocument,
);
