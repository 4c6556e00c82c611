//! Filesystem document source
//!
//! Documents live as `<root>/<name>.json`, one file per kind.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::ports::{DocumentKind, DocumentSource, FetchError};

pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn fetch(&self, kind: DocumentKind) -> Result<String, FetchError> {
        let path = self.root.join(format!("{}.json", kind.file_name()));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(kind.file_name()))
            }
            Err(error) => Err(FetchError::Transport(error.to_string())),
        }
    }
}
