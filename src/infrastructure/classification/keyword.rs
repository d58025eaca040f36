//! Lexical-cue classifier
//!
//! Every query starts with a factual baseline; each comparative or
//! inferential cue found in the text adds weight to that category.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::{DomainError, LabelDistribution, QueryClassifier, QueryType};

static COMPARATIVE_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(compare[ds]?|comparing|comparison|versus|vs|differ(s|ed|ence|ences|ent)?|than|relative to|superior|inferior|better|worse)\b",
    )
    .expect("Invalid comparative cue pattern")
});

static INFERENTIAL_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(predict(s|ed|ion)?|expect(s|ed)?|long[- ]term|infer(s|red|ence)?|likely|potential(ly)?|implications?|suggests?|would|could|future)\b",
    )
    .expect("Invalid inferential cue pattern")
});

const FACTUAL_BASELINE: f64 = 1.0;
const CUE_WEIGHT: f64 = 2.0;

/// Deterministic classifier over regex cue sets
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordQueryClassifier;

impl KeywordQueryClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QueryClassifier for KeywordQueryClassifier {
    async fn classify(&self, text: &str) -> Result<LabelDistribution, DomainError> {
        let comparative = COMPARATIVE_CUES.find_iter(text).count();
        let inferential = INFERENTIAL_CUES.find_iter(text).count();

        debug!(comparative, inferential, "Counted classification cues");

        Ok(LabelDistribution::from_weights([
            (QueryType::Factual, FACTUAL_BASELINE),
            (QueryType::Comparative, comparative as f64 * CUE_WEIGHT),
            (QueryType::Inferential, inferential as f64 * CUE_WEIGHT),
        ]))
    }

    fn classifier_name(&self) -> &'static str {
        "keyword"
    }
}
