//! Structured extraction domain
//!
//! The record being refined, how successive records are merged, how
//! complete a record is for a question, and which follow-up questions to
//! ask when it is not complete enough.

mod confidence;
mod extractor;
mod follow_up;
mod merge;
mod record;
mod validation;

pub use confidence::{
    ConfidenceEvaluator, ConfidenceScorer, REQUIRED_FIELDS, RELEVANCE_BONUS, RequiredField,
    meets_threshold,
};
pub use extractor::Extractor;
pub use follow_up::follow_up_questions;
pub use merge::{MergePolicy, MergeStrategy};
pub use record::{ExtractedData, ExtractedFeature, StudyMetadata};
pub use validation::{ExtractionSchemaValidator, RecordValidator, ValidationReport};

#[cfg(test)]
pub use confidence::mock::ScriptedScorer;
#[cfg(test)]
pub use extractor::mock::ScriptedExtractor;
