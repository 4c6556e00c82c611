//! In-memory document source
//!
//! Fixed documents handed over at construction; used by tests and by hosts
//! that embed configuration instead of shipping files.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::ports::{DocumentKind, DocumentSource, FetchError};

#[derive(Debug, Clone, Default)]
pub struct StaticDocumentSource {
    documents: HashMap<DocumentKind, String>,
}

impl StaticDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register one document's raw JSON text.
    pub fn with_document(mut self, kind: DocumentKind, text: impl Into<String>) -> Self {
        self.documents.insert(kind, text.into());
        self
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn fetch(&self, kind: DocumentKind) -> Result<String, FetchError> {
        self.documents
            .get(&kind)
            .cloned()
            .ok_or(FetchError::NotFound(kind.file_name()))
    }
}
