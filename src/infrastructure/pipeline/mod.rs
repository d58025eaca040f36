//! Question answering pipeline
//!
//! [`SectionProcessor`] answers per section, [`Orchestrator`] walks the
//! ranked documents for one question and [`QuestionRunner`] batches
//! questions and persists their results.

mod orchestrator;
mod runner;
mod section_processor;

pub use orchestrator::Orchestrator;
pub use runner::{QuestionRunner, Questions, RunSummary, load_questions, parse_questions};
pub use section_processor::SectionProcessor;
