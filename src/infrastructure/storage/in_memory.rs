//! In-memory result store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, QuestionResult, ResultStore};

/// Thread-safe in-memory result store
///
/// Useful for `ask` and tests. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<String, QuestionResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Result<Option<QuestionResult>, DomainError> {
        let results = self
            .results
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(results.get(question_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.results.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, result: &QuestionResult) -> Result<String, DomainError> {
        let mut results = self
            .results
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        results.insert(result.question_id.clone(), result.clone());

        Ok(format!("memory://{}", result.question_id))
    }
}
