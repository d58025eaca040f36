//! Follow-up questions for incomplete records

use super::{ConfidenceEvaluator, ExtractedData};

/// One question per missing required field; the original question when nothing is missing
pub fn follow_up_questions(data: &ExtractedData, question: &str) -> Vec<String> {
    let questions: Vec<String> = ConfidenceEvaluator
        .missing_fields(data)
        .into_iter()
        .map(|field| field.follow_up.to_string())
        .collect();

    if questions.is_empty() {
        vec![question.to_string()]
    } else {
        questions
    }
}
