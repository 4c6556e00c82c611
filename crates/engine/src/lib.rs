//! Sheetsmith Engine - configuration loading, caching, and record
//! persistence.
//!
//! The domain crate owns the rules; this crate owns the lifecycle: fetching
//! documents through the [`ports::DocumentSource`] port, memoizing the
//! resolved configuration, and moving character records in and out of
//! storage text.

pub mod config_service;
pub mod error;
pub mod persistence;
pub mod ports;
pub mod sources;

pub use config_service::{ConfigService, LoadState};
pub use error::{ConfigError, PersistError};
pub use persistence::{deserialize_record, serialize_record};
pub use ports::{DocumentKind, DocumentSource, FetchError};
pub use sources::{FsDocumentSource, StaticDocumentSource};
