//! Batch driver: every question in a questions file against the document collection

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::{DomainError, QuestionResult, ResultStore};

use super::Orchestrator;

/// Question id to question text, in file order
pub type Questions = IndexMap<String, String>;

/// Counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Results persisted
    pub processed: usize,
    /// Persisted results that met the confidence threshold
    pub satisfied: usize,
    /// Questions skipped or not persisted
    pub failed: usize,
}

/// Parse a `{question_id: question_text}` JSON object, keeping file order
pub fn parse_questions(source: &str) -> Result<Questions, DomainError> {
    serde_json::from_str(source)
        .map_err(|e| DomainError::validation(format!("Invalid questions file: {}", e)))
}

pub async fn load_questions(path: &Path) -> Result<Questions, DomainError> {
    let source = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::not_found(format!("Cannot read questions file {}: {}", path.display(), e))
    })?;

    parse_questions(&source)
}

/// Runs questions sequentially and persists one result per question
#[derive(Clone)]
pub struct QuestionRunner {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn ResultStore>,
}

impl QuestionRunner {
    pub fn new(orchestrator: Arc<Orchestrator>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// Answer one question over the full ranked collection
    pub async fn ask(&self, question_id: &str, question: &str) -> Result<QuestionResult, DomainError> {
        let documents = self.orchestrator.source().list().await?;
        let answer = self.orchestrator.answer(question, &documents).await;

        Ok(QuestionResult::new(question_id, question, answer))
    }

    /// Process every question; only a failure to list documents aborts the run
    pub async fn run(&self, questions: &Questions) -> Result<RunSummary, DomainError> {
        let documents = self.orchestrator.source().list().await?;
        info!(
            questions = questions.len(),
            documents = documents.len(),
            "Starting question run"
        );

        let mut summary = RunSummary::default();

        for (id, text) in questions {
            if text.trim().is_empty() {
                warn!(question_id = %id, "Skipping blank question");
                summary.failed += 1;
                continue;
            }

            info!(question_id = %id, "Processing question");
            let answer = self.orchestrator.answer(text, &documents).await;
            let result = QuestionResult::new(id.as_str(), text.as_str(), answer);

            match self.store.save(&result).await {
                Ok(location) => {
                    summary.processed += 1;
                    if result.satisfied {
                        summary.satisfied += 1;
                    }
                    info!(
                        question_id = %id,
                        satisfied = result.satisfied,
                        confidence = result.confidence_score,
                        location = %location,
                        "Question processed"
                    );
                }
                Err(e) => {
                    error!(question_id = %id, error = %e, "Failed to persist result");
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            satisfied = summary.satisfied,
            failed = summary.failed,
            "Question run finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::{ScriptedExtractor, ScriptedScorer};
    use crate::domain::llm::ScriptedGenerator;
    use crate::domain::query::MockQueryClassifier;
    use crate::domain::{
        Document, DocumentSource, GenerationParams, IterativeRefiner, MergeStrategy,
        MockDocumentSource, MockResultStore, PromptBuilder, QueryType,
    };
    use crate::infrastructure::pipeline::SectionProcessor;
    use crate::infrastructure::sampling::ConsistencySampler;
    use crate::infrastructure::storage::InMemoryResultStore;
    use mockall::predicate::always;

    fn orchestrator(source: MockDocumentSource) -> Arc<Orchestrator> {
        let generator = ScriptedGenerator::new()
            .on("agree", &["Mortality fell by 30%.", "Mortality fell by 30% ."])
            .with_fallback(&["alpha", "omega"]);
        let sampler = ConsistencySampler::new(
            Arc::new(generator),
            GenerationParams::default().with_samples(2),
        );
        let sections = SectionProcessor::new(
            Arc::new(MockQueryClassifier::returning(QueryType::Factual)),
            Arc::new(PromptBuilder::default()),
            Arc::new(sampler),
        );
        let extractor = Arc::new(ScriptedExtractor::new());
        let refiner = IterativeRefiner::new(
            extractor.clone(),
            Arc::new(ScriptedScorer::constant(0.2)),
            Arc::new(MergeStrategy::Replace),
        );
        let source: Arc<dyn DocumentSource> = Arc::new(source);

        Arc::new(Orchestrator::new(source, sections, extractor, refiner))
    }

    fn source() -> MockDocumentSource {
        let mut source = MockDocumentSource::new();
        source
            .expect_list()
            .returning(|| Ok(vec!["trial.txt".to_string()]));
        source.expect_fetch().returning(|id| {
            Ok(Document::new(
                id,
                "RESULTS\nMortality data (agree)\nMETHODS\nRandomized",
            ))
        });
        source
    }

    #[test]
    fn test_parse_questions_keeps_file_order() {
        let questions =
            parse_questions(r#"{"10": "Tenth", "2": "Second", "1": "First"}"#).unwrap();

        assert_eq!(questions.keys().collect::<Vec<_>>(), vec!["10", "2", "1"]);
        assert!(parse_questions("[\"not\", \"an object\"]").is_err());
    }

    #[tokio::test]
    async fn test_load_questions_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, r#"{"q1": "What was the dose?"}"#).unwrap();

        let questions = load_questions(&path).await.unwrap();
        assert_eq!(questions["q1"], "What was the dose?");

        assert!(load_questions(&dir.path().join("missing.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_run_persists_every_question() {
        let store = Arc::new(InMemoryResultStore::new());
        let runner = QuestionRunner::new(orchestrator(source()), store.clone());

        let questions = parse_questions(
            r#"{"q1": "How much did mortality fall?", "q2": "   ", "q3": "What was the design?"}"#,
        )
        .unwrap();
        let summary = runner.run(&questions).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                processed: 2,
                satisfied: 2,
                failed: 1
            }
        );

        let q1 = store.get("q1").unwrap().unwrap();
        assert_eq!(q1.related_document.as_deref(), Some("trial.txt"));
        assert_eq!(q1.steps_taken, 0);
        assert!(store.get("q2").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failures_are_counted() {
        let mut store = MockResultStore::new();
        store
            .expect_save()
            .with(always())
            .times(2)
            .returning(|_| Err(DomainError::storage("disk full")));

        let runner = QuestionRunner::new(orchestrator(source()), Arc::new(store));
        let questions = parse_questions(r#"{"a": "first?", "b": "second?"}"#).unwrap();

        let summary = runner.run(&questions).await.unwrap();

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_listing_failure_aborts_run() {
        let mut source = MockDocumentSource::new();
        source
            .expect_list()
            .returning(|| Err(DomainError::not_found("no articles directory")));

        let runner = QuestionRunner::new(orchestrator(source), Arc::new(InMemoryResultStore::new()));
        let questions = parse_questions(r#"{"a": "first?"}"#).unwrap();

        assert!(runner.run(&questions).await.is_err());
    }

    #[tokio::test]
    async fn test_ask_returns_result_without_saving() {
        let runner = QuestionRunner::new(orchestrator(source()), Arc::new(MockResultStore::new()));

        let result = runner.ask("adhoc", "How much did mortality fall?").await.unwrap();

        assert_eq!(result.question_id, "adhoc");
        assert!(result.satisfied);
    }
}
