//! Per-section answering
//!
//! Classifies the query once, builds one prompt per section and samples
//! them all through the shared [`ConsistencySampler`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    PromptBuilder, Query, QueryClassifier, QueryType, SectionResult, SectionResults, Sections,
    classify_query,
};
use crate::infrastructure::sampling::ConsistencySampler;

/// Runs the classify, prompt and sample steps for every section of a document
#[derive(Debug, Clone)]
pub struct SectionProcessor {
    classifier: Arc<dyn QueryClassifier>,
    fallback: Option<QueryType>,
    prompts: Arc<PromptBuilder>,
    sampler: Arc<ConsistencySampler>,
}

impl SectionProcessor {
    pub fn new(
        classifier: Arc<dyn QueryClassifier>,
        prompts: Arc<PromptBuilder>,
        sampler: Arc<ConsistencySampler>,
    ) -> Self {
        Self {
            classifier,
            fallback: None,
            prompts,
            sampler,
        }
    }

    /// Category used when the classifier is unavailable
    pub fn with_fallback(mut self, fallback: Option<QueryType>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Query category, or the fallback when classification fails.
    ///
    /// `None` means unclassified: aggregation passes every section through.
    pub async fn categorize(&self, query: &Query) -> Option<QueryType> {
        match classify_query(self.classifier.as_ref(), query.text()).await {
            Ok(category) => {
                debug!(%category, classifier = self.classifier.classifier_name(), "Classified query");
                Some(category)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = ?self.fallback,
                    "Classification unavailable, using fallback category"
                );
                self.fallback
            }
        }
    }

    /// One result per section that sampled successfully, in section order
    pub async fn process(
        &self,
        query: &Query,
        category: Option<QueryType>,
        sections: &Sections,
    ) -> SectionResults {
        let prompts: Vec<String> = sections
            .iter()
            .map(|section| {
                self.prompts
                    .build_or_fallback(query, category, &section.name, &section.text)
            })
            .collect();

        let samples = self.sampler.sample_all(&prompts).await;

        let mut results = SectionResults::new();
        for (section, sampled) in sections.iter().zip(samples) {
            match sampled {
                Ok(set) => {
                    debug!(
                        section = %section.name,
                        consistency = set.consistency,
                        "Section answered"
                    );
                    results.insert(
                        section.name.clone(),
                        SectionResult::new(
                            section.name.clone(),
                            category,
                            set.consistency,
                            set.representative,
                        ),
                    );
                }
                Err(e) => {
                    warn!(section = %section.name, error = %e, "Skipping section after generation failure");
                }
            }
        }

        results
    }
}
