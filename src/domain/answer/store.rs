//! Result persistence port

use super::QuestionResult;
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Sink for per-question results
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persists a result, returning where it was written
    async fn save(&self, result: &QuestionResult) -> Result<String, DomainError>;
}
