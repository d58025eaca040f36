//! Iterative refiner state machine

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{RefinementConfig, RefinementOutcome, RefinementState, RefinementStep};
use crate::domain::extraction::{ConfidenceScorer, ExtractedData, Extractor, MergePolicy};

/// Repeats extraction and scoring until the threshold is met or the budget runs out.
///
/// Pending questions are taken round-robin, one per iteration. The loop
/// stops as soon as any question scores at or above the threshold, even
/// if later questions were never asked.
#[derive(Debug, Clone)]
pub struct IterativeRefiner {
    extractor: Arc<dyn Extractor>,
    scorer: Arc<dyn ConfidenceScorer>,
    merge: Arc<dyn MergePolicy>,
    config: RefinementConfig,
}

/// Mutable run state; the record itself is only ever replaced, never edited
struct Run {
    state: RefinementState,
    data: Arc<ExtractedData>,
    confidence: f64,
    iterations: u32,
    active: usize,
    trace: Vec<RefinementStep>,
}

impl Run {
    fn record(&mut self, question: &str) {
        self.trace.push(RefinementStep {
            iteration: self.iterations,
            state: self.state,
            question: question.to_string(),
            confidence: self.confidence,
            snapshot: Arc::clone(&self.data),
        });
    }
}

impl IterativeRefiner {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        scorer: Arc<dyn ConfidenceScorer>,
        merge: Arc<dyn MergePolicy>,
    ) -> Self {
        Self {
            extractor,
            scorer,
            merge,
            config: RefinementConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RefinementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Refine `data` against `document` for the pending `questions`
    pub async fn refine(
        &self,
        document: &str,
        data: ExtractedData,
        questions: &[String],
    ) -> RefinementOutcome {
        let mut run = Run {
            state: RefinementState::Initial,
            data: Arc::new(data),
            confidence: 0.0,
            iterations: 0,
            active: 0,
            trace: Vec::new(),
        };

        while !run.state.is_terminal() {
            let question = questions.get(run.active).map(String::as_str).unwrap_or("");

            run.state = match run.state {
                RefinementState::Initial => {
                    run.confidence = self.scorer.score(&run.data, question);
                    RefinementState::Evaluating
                }
                RefinementState::Evaluating => self.evaluate(&run, questions.is_empty()),
                RefinementState::Extracting => {
                    self.extract(document, &mut run, question).await;
                    run.active = (run.active + 1) % questions.len();
                    RefinementState::Evaluating
                }
                terminal => terminal,
            };

            run.record(question);
        }

        info!(
            state = %run.state,
            iterations = run.iterations,
            confidence = run.confidence,
            "Refinement finished"
        );

        RefinementOutcome {
            data: Arc::unwrap_or_clone(run.data),
            confidence: run.confidence,
            iterations: run.iterations,
            state: run.state,
            trace: run.trace,
        }
    }

    fn evaluate(&self, run: &Run, no_questions: bool) -> RefinementState {
        if self.config.is_satisfied(run.confidence) {
            RefinementState::Satisfied
        } else if no_questions || run.iterations >= self.config.max_iterations() {
            RefinementState::Exhausted
        } else {
            RefinementState::Extracting
        }
    }

    /// One iteration: extract unless already answered, merge, re-score
    async fn extract(&self, document: &str, run: &mut Run, question: &str) {
        if let Some(answer) = run.data.answer_for(question) {
            debug!(question, answer, "Question already answered, skipping extraction");
        } else {
            match self.extractor.extract(document, &run.data, question).await {
                Ok(incoming) => {
                    run.data = Arc::new(self.merge.merge(&run.data, incoming));
                }
                Err(e) => {
                    warn!(question, "Extraction failed, keeping prior record: {}", e);
                }
            }
        }

        run.iterations += 1;
        run.confidence = self.scorer.score(&run.data, question);

        debug!(
            iteration = run.iterations,
            question,
            confidence = run.confidence,
            "Refinement iteration complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::domain::extraction::{
        ConfidenceEvaluator, MergeStrategy, ScriptedExtractor, ScriptedScorer,
    };

    fn refiner(extractor: Arc<ScriptedExtractor>, scorer: Arc<dyn ConfidenceScorer>) -> IterativeRefiner {
        IterativeRefiner::new(extractor, scorer, Arc::new(MergeStrategy::Replace))
    }

    fn questions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_satisfied_on_third_iteration() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let scorer = Arc::new(ScriptedScorer::new(&[0.0, 0.3, 0.5, 0.9]));
        let refiner = refiner(extractor.clone(), scorer);

        let outcome = refiner
            .refine("doc", ExtractedData::default(), &questions(&["Q1"]))
            .await;

        assert_eq!(outcome.state, RefinementState::Satisfied);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.confidence, 0.9);
        assert_eq!(extractor.call_count(), 3);
        assert!(outcome.ensure_satisfied().is_ok());
    }

    #[tokio::test]
    async fn test_exhausted_at_cap() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let scorer = Arc::new(ScriptedScorer::constant(0.3));
        let refiner = refiner(extractor.clone(), scorer.clone());

        let outcome = refiner
            .refine("doc", ExtractedData::default(), &questions(&["Q1"]))
            .await;

        assert_eq!(outcome.state, RefinementState::Exhausted);
        assert_eq!(outcome.iterations, 5);
        assert_eq!(extractor.call_count(), 5);
        assert_eq!(scorer.call_count(), 6);
        assert!(matches!(
            outcome.ensure_satisfied(),
            Err(DomainError::IterationExhausted { iterations: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_already_satisfied_does_not_extract() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let refiner = refiner(extractor.clone(), Arc::new(ScriptedScorer::constant(0.85)));

        let outcome = refiner
            .refine("doc", ExtractedData::default(), &questions(&["Q1"]))
            .await;

        assert_eq!(outcome.state, RefinementState::Satisfied);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_questions_rotate_round_robin() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let scorer = Arc::new(ScriptedScorer::constant(0.1));
        let refiner = refiner(extractor.clone(), scorer.clone());

        refiner
            .refine("doc", ExtractedData::default(), &questions(&["A", "B"]))
            .await;

        assert_eq!(extractor.questions(), vec!["A", "B", "A", "B", "A"]);
        assert_eq!(scorer.questions(), vec!["A", "A", "B", "A", "B", "A"]);
    }

    #[tokio::test]
    async fn test_stops_at_first_satisfied_question() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let scorer = Arc::new(ScriptedScorer::new(&[0.1, 0.2, 0.95]));
        let refiner = refiner(extractor.clone(), scorer);

        let outcome = refiner
            .refine("doc", ExtractedData::default(), &questions(&["A", "B", "C"]))
            .await;

        assert!(outcome.is_satisfied());
        assert_eq!(extractor.questions(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_failed_extraction_keeps_prior_record() {
        let prior = ExtractedData::new("Trial").with_feature("Study design", "RCT");
        let extractor = Arc::new(
            ScriptedExtractor::new()
                .then(Err(DomainError::generation_parse("not json")))
                .then(Ok(ExtractedData::new("")
                    .with_feature("Study design", "RCT")
                    .with_feature("Outcomes", "70% improvement")
                    .with_feature("Statistical significance", "p<0.01"))),
        );
        let refiner = IterativeRefiner::new(
            extractor.clone(),
            Arc::new(ConfidenceEvaluator),
            Arc::new(MergeStrategy::Replace),
        );

        let outcome = refiner
            .refine("doc", prior, &questions(&["What were the outcomes?"]))
            .await;

        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.state, RefinementState::Satisfied);
        assert_eq!(outcome.data.description, "Trial");
        assert_eq!(outcome.data.extracted_features.len(), 3);

        // after the failed call the snapshot still holds the prior record
        let after_failure = outcome
            .trace
            .iter()
            .find(|s| s.iteration == 1)
            .unwrap();
        assert_eq!(after_failure.snapshot.extracted_features.len(), 1);
    }

    #[tokio::test]
    async fn test_answered_question_skips_extractor() {
        let data = ExtractedData::new("x").with_feature("What is the dose? Daily", "50mg");
        let extractor = Arc::new(ScriptedExtractor::new());
        let refiner = refiner(extractor.clone(), Arc::new(ScriptedScorer::constant(0.2)));

        let outcome = refiner
            .refine("doc", data, &questions(&["What is the dose?"]))
            .await;

        assert_eq!(outcome.iterations, 5);
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_questions_terminates_immediately() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let refiner = refiner(extractor.clone(), Arc::new(ConfidenceEvaluator));

        let outcome = refiner.refine("doc", ExtractedData::default(), &[]).await;

        assert_eq!(outcome.state, RefinementState::Exhausted);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_trace_ends_in_terminal_state() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let refiner = refiner(extractor, Arc::new(ScriptedScorer::constant(0.3)))
            .with_config(RefinementConfig::new().with_max_iterations(2));

        let outcome = refiner
            .refine("doc", ExtractedData::default(), &questions(&["Q"]))
            .await;

        let states: Vec<_> = outcome.trace.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                RefinementState::Evaluating,
                RefinementState::Extracting,
                RefinementState::Evaluating,
                RefinementState::Extracting,
                RefinementState::Evaluating,
                RefinementState::Exhausted,
            ]
        );
    }
}
