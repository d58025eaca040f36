//! Document source port

use super::Document;
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Ranked supply of candidate documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Document identifiers, best candidate first
    async fn list(&self) -> Result<Vec<String>, DomainError>;

    /// Loads one document by identifier
    async fn fetch(&self, id: &str) -> Result<Document, DomainError>;
}
