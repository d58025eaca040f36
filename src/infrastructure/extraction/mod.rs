//! Extraction port implementations

mod llm_extractor;

pub use llm_extractor::{FOLLOW_UP_TEMPLATE, INITIAL_TEMPLATE, LlmExtractor};
