//! Classification port and label selection

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::QueryType;
use crate::domain::DomainError;

/// One label with its score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: QueryType,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: QueryType, score: f64) -> Self {
        Self { label, score }
    }
}

/// Score distribution over query categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelDistribution {
    scores: Vec<LabelScore>,
}

impl LabelDistribution {
    pub fn new(scores: Vec<LabelScore>) -> Self {
        Self { scores }
    }

    /// Build from raw weights, normalized to sum to one
    pub fn from_weights(weights: [(QueryType, f64); 3]) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        let scores = weights
            .iter()
            .map(|(label, w)| {
                let score = if total > 0.0 { w.max(0.0) / total } else { 0.0 };
                LabelScore::new(*label, score)
            })
            .collect();
        Self { scores }
    }

    pub fn scores(&self) -> &[LabelScore] {
        &self.scores
    }

    pub fn score_of(&self, label: QueryType) -> Option<f64> {
        self.scores.iter().find(|s| s.label == label).map(|s| s.score)
    }

    /// Argmax label; ties go to the earliest entry
    pub fn top(&self) -> Option<LabelScore> {
        let mut best: Option<LabelScore> = None;

        for entry in &self.scores {
            if entry.score.is_nan() {
                continue;
            }
            match best {
                Some(current) if entry.score <= current.score => {}
                _ => best = Some(*entry),
            }
        }

        best
    }
}

/// Classification capability
#[async_trait]
pub trait QueryClassifier: Send + Sync + Debug {
    /// Label distribution for the text.
    ///
    /// Returns [`DomainError::ClassificationUnavailable`] when the backend
    /// cannot be reached.
    async fn classify(&self, text: &str) -> Result<LabelDistribution, DomainError>;

    fn classifier_name(&self) -> &'static str;
}

/// Classify a query and pick the argmax category
pub async fn classify_query(
    classifier: &dyn QueryClassifier,
    text: &str,
) -> Result<QueryType, DomainError> {
    let distribution = classifier.classify(text).await?;

    distribution.top().map(|s| s.label).ok_or_else(|| {
        DomainError::classification_unavailable(format!(
            "{} returned an empty distribution",
            classifier.classifier_name()
        ))
    })
}
