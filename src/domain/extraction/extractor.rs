//! Extraction port

use async_trait::async_trait;
use std::fmt::Debug;

use super::ExtractedData;
use crate::domain::DomainError;

/// Turns document text into structured records
#[async_trait]
pub trait Extractor: Send + Sync + Debug {
    /// First-pass extraction for a query
    async fn initial(&self, document: &str, query: &str) -> Result<ExtractedData, DomainError>;

    /// Targeted extraction for one follow-up question, given the current record
    async fn extract(
        &self,
        document: &str,
        current: &ExtractedData,
        question: &str,
    ) -> Result<ExtractedData, DomainError>;
}
