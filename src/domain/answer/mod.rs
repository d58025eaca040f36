//! Per-question results and their persistence port

mod store;

pub use store::ResultStore;

#[cfg(test)]
pub use store::MockResultStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregation::AggregatedResult;
use crate::domain::extraction::ExtractedData;

/// Best answer found for a question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalAnswer {
    /// Aggregated section answer text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Refined extraction record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedData>,
}

impl FinalAnswer {
    pub fn from_aggregate(aggregate: &AggregatedResult) -> Self {
        Self {
            response: aggregate.answer(),
            extracted: None,
        }
    }

    pub fn with_extracted(mut self, data: ExtractedData) -> Self {
        self.extracted = Some(data);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_none() && self.extracted.is_none()
    }
}

/// Outcome of running one question across the document collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Document the answer came from, if any
    pub related_document: Option<String>,
    /// Documents examined without reaching the threshold
    pub steps_taken: u32,
    pub confidence_score: f64,
    pub final_answer: Option<FinalAnswer>,
    pub follow_up_questions: Vec<String>,
    pub satisfied: bool,
}

impl QuestionAnswer {
    pub fn empty() -> Self {
        Self {
            related_document: None,
            steps_taken: 0,
            confidence_score: 0.0,
            final_answer: None,
            follow_up_questions: Vec::new(),
            satisfied: false,
        }
    }
}

/// Persisted record, one per question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_text: String,
    pub related_document: Option<String>,
    pub steps_taken: u32,
    pub confidence_score: f64,
    pub final_answer: Option<FinalAnswer>,
    pub follow_up_questions: Vec<String>,
    pub satisfied: bool,
    pub processed_at: DateTime<Utc>,
}

impl QuestionResult {
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        answer: QuestionAnswer,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_text: question_text.into(),
            related_document: answer.related_document,
            steps_taken: answer.steps_taken,
            confidence_score: answer.confidence_score,
            final_answer: answer.final_answer,
            follow_up_questions: answer.follow_up_questions,
            satisfied: answer.satisfied,
            processed_at: Utc::now(),
        }
    }
}
