//! Query classification backends
//!
//! The backend is chosen once at start-up from [`ClassificationConfig`];
//! call sites only ever see an `Arc<dyn QueryClassifier>`.

mod keyword;
mod llm;

pub use keyword::KeywordQueryClassifier;
pub use llm::LlmQueryClassifier;

use std::sync::Arc;

use crate::config::{ClassificationBackend, ClassificationConfig};
use crate::domain::{QueryClassifier, TextGenerator};

/// Resolves the configured classification backend
#[derive(Debug)]
pub struct ClassifierFactory;

impl ClassifierFactory {
    /// `generator` is only used by the `llm` backend
    pub fn create(
        config: &ClassificationConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Arc<dyn QueryClassifier> {
        match config.backend {
            ClassificationBackend::Keyword => Arc::new(KeywordQueryClassifier::new()),
            ClassificationBackend::Llm => Arc::new(LlmQueryClassifier::new(generator)),
        }
    }
}
