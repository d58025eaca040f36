//! Domain layer - Core types, ports and algorithms

pub mod aggregation;
pub mod answer;
pub mod consistency;
pub mod document;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod prompt;
pub mod query;
pub mod refinement;

pub use aggregation::{
    AggregatedResult, AggregationPolicy, CombinedAnswer, SectionResult, SectionResults, aggregate,
};
pub use answer::{FinalAnswer, QuestionAnswer, QuestionResult, ResultStore};
pub use consistency::{SampleSet, consistency_score, select_representative};
pub use document::{Document, DocumentSegmenter, DocumentSource, Section, SectionVocabulary, Sections};
pub use error::DomainError;
pub use extraction::{
    ConfidenceEvaluator, ConfidenceScorer, ExtractedData, ExtractedFeature,
    ExtractionSchemaValidator, Extractor, MergePolicy, MergeStrategy, RecordValidator,
    StudyMetadata, ValidationReport, follow_up_questions,
};
pub use llm::{
    GenerationParams, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, RetryPolicy,
    TextGenerator, Usage,
};
pub use prompt::{ExemplarTable, PromptBuilder, PromptTemplate};
pub use query::{LabelDistribution, LabelScore, Query, QueryClassifier, QueryType, classify_query};
pub use refinement::{
    IterativeRefiner, RefinementConfig, RefinementOutcome, RefinementState, RefinementStep,
};

#[cfg(test)]
pub use answer::MockResultStore;
#[cfg(test)]
pub use document::MockDocumentSource;
