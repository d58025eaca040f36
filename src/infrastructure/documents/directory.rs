//! Plain-text documents read from a directory
//!
//! PDF and corpus text extraction happen upstream; this source only reads
//! `.txt` and `.md` files that already hold the article text.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Document, DocumentSource, DomainError};

const EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Serves every text file in a directory, ranked by file name
#[derive(Debug, Clone)]
pub struct DirectoryDocumentSource {
    root: PathBuf,
}

impl DirectoryDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_document(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
    }
}

#[async_trait]
impl DocumentSource for DirectoryDocumentSource {
    async fn list(&self) -> Result<Vec<String>, DomainError> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            DomainError::not_found(format!(
                "Cannot read document directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list documents: {}", e)))?
        {
            let path = entry.path();
            if !path.is_file() || !Self::is_document(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                ids.push(name.to_string());
            }
        }

        ids.sort();
        debug!(root = %self.root.display(), count = ids.len(), "Listed documents");

        Ok(ids)
    }

    async fn fetch(&self, id: &str) -> Result<Document, DomainError> {
        if Path::new(id).components().count() != 1 {
            return Err(DomainError::validation(format!(
                "Document id must be a file name: {}",
                id
            )));
        }

        let path = self.root.join(id);
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DomainError::not_found(format!("Cannot read document {}: {}", path.display(), e))
        })?;

        Ok(Document::new(id, text))
    }
}
