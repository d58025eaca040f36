//! Question-level driver across a ranked document collection

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::extraction::meets_threshold;
use crate::domain::{
    AggregationPolicy, DocumentSegmenter, DocumentSource, DomainError, ExtractedData, Extractor,
    FinalAnswer, IterativeRefiner, Query, QuestionAnswer, follow_up_questions,
};

use super::SectionProcessor;

/// Best unsatisfied candidate seen so far
struct Candidate {
    document: String,
    confidence: f64,
    answer: FinalAnswer,
    follow_ups: Vec<String>,
}

/// Drives one question across documents until a section answer is confident enough
pub struct Orchestrator {
    source: Arc<dyn DocumentSource>,
    segmenter: DocumentSegmenter,
    sections: SectionProcessor,
    aggregation: AggregationPolicy,
    extractor: Arc<dyn Extractor>,
    refiner: IterativeRefiner,
    threshold: f64,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("segmenter", &self.segmenter)
            .field("aggregation", &self.aggregation)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        sections: SectionProcessor,
        extractor: Arc<dyn Extractor>,
        refiner: IterativeRefiner,
    ) -> Self {
        let threshold = refiner.config().threshold();
        Self {
            source,
            segmenter: DocumentSegmenter::default(),
            sections,
            aggregation: AggregationPolicy::default(),
            extractor,
            refiner,
            threshold,
        }
    }

    pub fn with_segmenter(mut self, segmenter: DocumentSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Aggregated section confidence needed to stop early
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// Answer `question` from the documents in `document_ids`, best candidate first.
    ///
    /// Stops at the first document whose aggregated section answer meets the
    /// threshold. Otherwise every document is refined and the one with the
    /// highest refined confidence is reported, unsatisfied. Failures on one
    /// document are logged and count as a step.
    pub async fn answer(&self, question: &str, document_ids: &[String]) -> QuestionAnswer {
        let query = Query::new(question);
        let category = self.sections.categorize(&query).await;

        let mut steps = 0u32;
        let mut best: Option<Candidate> = None;

        for id in document_ids {
            // Step 1: load and segment
            let document = match self.source.fetch(id).await {
                Ok(document) => document,
                Err(e) => {
                    warn!(document = %id, error = %e, "Skipping unreadable document");
                    steps += 1;
                    continue;
                }
            };

            let sections = self.segmenter.segment(document.text());
            if sections.is_empty() {
                warn!("{}", DomainError::segmentation_empty(id.as_str()));
            }

            // Step 2: answer per section and aggregate
            let results = self.sections.process(&query, category, &sections).await;
            let aggregated = self.aggregation.aggregate(results, category);
            let confidence = aggregated.confidence();

            debug!(document = %id, confidence, "Aggregated section answers");

            if meets_threshold(confidence, self.threshold) {
                info!(document = %id, confidence, steps, "Question satisfied");
                return QuestionAnswer {
                    related_document: Some(id.clone()),
                    steps_taken: steps,
                    confidence_score: confidence,
                    final_answer: Some(FinalAnswer::from_aggregate(&aggregated)),
                    follow_up_questions: Vec::new(),
                    satisfied: true,
                };
            }

            // Step 3: structured extraction and refinement
            let initial = match self.extractor.initial(document.text(), query.text()).await {
                Ok(data) => data,
                Err(e) => {
                    warn!(document = %id, error = %e, "Initial extraction failed, refining from an empty record");
                    ExtractedData::default()
                }
            };

            let follow_ups = follow_up_questions(&initial, query.text());
            let outcome = self
                .refiner
                .refine(document.text(), initial, &follow_ups)
                .await;

            debug!(
                document = %id,
                state = %outcome.state,
                confidence = outcome.confidence,
                "Refined extraction"
            );

            if best
                .as_ref()
                .is_none_or(|current| outcome.confidence > current.confidence)
            {
                best = Some(Candidate {
                    document: id.clone(),
                    confidence: outcome.confidence,
                    answer: FinalAnswer::from_aggregate(&aggregated).with_extracted(outcome.data),
                    follow_ups,
                });
            }

            steps += 1;
        }

        info!(steps, documents = document_ids.len(), "Question not satisfied by any document");

        match best {
            Some(candidate) => QuestionAnswer {
                related_document: Some(candidate.document),
                steps_taken: steps,
                confidence_score: candidate.confidence,
                final_answer: Some(candidate.answer),
                follow_up_questions: candidate.follow_ups,
                satisfied: false,
            },
            None => QuestionAnswer {
                steps_taken: steps,
                ..QuestionAnswer::empty()
            },
        }
    }
}
