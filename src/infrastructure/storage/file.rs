//! JSON file result store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::{DomainError, QuestionResult, ResultStore};

/// Writes one pretty-printed `result_<question_id>.json` per question
#[derive(Debug, Clone)]
pub struct FileResultStore {
    output_dir: PathBuf,
}

impl FileResultStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, question_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("result_{}.json", file_safe(question_id)))
    }
}

/// Question ids come from user data; keep them to one path component
fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ResultStore for FileResultStore {
    async fn save(&self, result: &QuestionResult) -> Result<String, DomainError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create {}: {}",
                    self.output_dir.display(),
                    e
                ))
            })?;

        let body = serde_json::to_string_pretty(result)
            .map_err(|e| DomainError::storage(format!("Failed to encode result: {}", e)))?;

        let path = self.path_for(&result.question_id);
        tokio::fs::write(&path, body).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(question_id = %result.question_id, path = %path.display(), "Saved result");

        Ok(path.display().to_string())
    }
}
