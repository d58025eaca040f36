//! Generation-backed classifier
//!
//! Asks the model for a JSON score per category. Transport and parse
//! failures are both reported as classification being unavailable so the
//! caller can substitute its fallback category.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::llm::extract_json;
use crate::domain::{
    DomainError, GenerationParams, LabelDistribution, QueryClassifier, QueryType, TextGenerator,
};

const CLASSIFICATION_PROMPT: &str = "Classify the following clinical trial question as factual, \
comparative or inferential. Factual questions ask for a stated value or fact, comparative \
questions contrast arms, groups or outcomes, inferential questions ask for predictions or \
implications beyond the reported data.\n\nReply with JSON only, scores between 0 and 1, for \
example: {\"factual\": 0.1, \"comparative\": 0.8, \"inferential\": 0.1}\n\nQuestion: ";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoreResponse {
    factual: f64,
    comparative: f64,
    inferential: f64,
}

/// Classifier that delegates to the generation port
#[derive(Debug, Clone)]
pub struct LlmQueryClassifier {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl LlmQueryClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            params: GenerationParams::new(100, 0.0, 1),
        }
    }

    fn parse(&self, reply: &str) -> Result<LabelDistribution, DomainError> {
        let json = extract_json(reply).ok_or_else(|| {
            DomainError::classification_unavailable("classifier reply contained no JSON object")
        })?;

        let scores: ScoreResponse = serde_json::from_str(json).map_err(|e| {
            DomainError::classification_unavailable(format!("invalid classifier reply: {}", e))
        })?;

        let weights = [
            (QueryType::Factual, scores.factual),
            (QueryType::Comparative, scores.comparative),
            (QueryType::Inferential, scores.inferential),
        ];

        if weights.iter().all(|(_, w)| !w.is_finite() || *w <= 0.0) {
            return Err(DomainError::classification_unavailable(
                "classifier reply scored every category zero",
            ));
        }

        Ok(LabelDistribution::from_weights(weights))
    }
}

#[async_trait]
impl QueryClassifier for LlmQueryClassifier {
    async fn classify(&self, text: &str) -> Result<LabelDistribution, DomainError> {
        let prompt = format!("{}{}", CLASSIFICATION_PROMPT, text);

        let replies = self
            .generator
            .generate(&prompt, &self.params)
            .await
            .map_err(|e| {
                warn!(generator = self.generator.generator_name(), error = %e, "Classification call failed");
                DomainError::classification_unavailable(e.to_string())
            })?;

        let reply = replies.first().ok_or_else(|| {
            DomainError::classification_unavailable("classifier returned no completion")
        })?;

        let distribution = self.parse(reply)?;
        debug!(?distribution, "Classified query");

        Ok(distribution)
    }

    fn classifier_name(&self) -> &'static str {
        "llm"
    }
}
