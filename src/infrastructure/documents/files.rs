//! Explicit list of document files, ranked as given

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{Document, DocumentSource, DomainError};

/// Serves the given files in the given order; ids are the paths as passed
#[derive(Debug, Clone)]
pub struct FileListDocumentSource {
    files: Vec<PathBuf>,
}

impl FileListDocumentSource {
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl DocumentSource for FileListDocumentSource {
    async fn list(&self) -> Result<Vec<String>, DomainError> {
        Ok(self
            .files
            .iter()
            .map(|path| path.display().to_string())
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Document, DomainError> {
        let path = self
            .files
            .iter()
            .find(|path| path.display().to_string() == id)
            .ok_or_else(|| DomainError::not_found(format!("Unknown document: {}", id)))?;

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::not_found(format!("Cannot read document {}: {}", path.display(), e))
        })?;

        Ok(Document::new(id, text))
    }
}
