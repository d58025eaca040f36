//! Clinical Trial QA
//!
//! Answers questions about clinical-trial reports with a confidence-driven pipeline:
//! - Section segmentation and query classification
//! - Few-shot prompting with multi-sample self-consistency scoring
//! - Query-type-aware aggregation of section answers
//! - Iterative structured extraction until the record is complete enough

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::{
    ConfidenceEvaluator, DocumentSegmenter, DocumentSource, DomainError, ExemplarTable,
    GenerationParams, IterativeRefiner, LlmProvider, PromptBuilder, RefinementConfig,
    SectionVocabulary, TextGenerator,
};
use infrastructure::{
    classification::ClassifierFactory,
    extraction::LlmExtractor,
    llm::{LlmGenerator, ProviderFactory},
    pipeline::{Orchestrator, SectionProcessor},
    sampling::ConsistencySampler,
};
use tracing::info;

/// Load the exemplar table; every category must be covered
pub async fn load_exemplars(config: &AppConfig) -> Result<ExemplarTable, DomainError> {
    let table = match &config.prompting.exemplars_path {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await.map_err(|e| {
                DomainError::configuration(format!(
                    "Cannot read exemplar file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            ExemplarTable::from_toml(&source)?
        }
        None => ExemplarTable::builtin(),
    };

    table.ensure_complete()?;
    Ok(table)
}

/// Build the orchestrator with the configured generation backend
pub async fn create_orchestrator(
    config: &AppConfig,
    source: Arc<dyn DocumentSource>,
) -> anyhow::Result<Orchestrator> {
    let provider = ProviderFactory::create(&config.generation)?;
    create_orchestrator_with_provider(config, provider, source).await
}

/// Build the orchestrator around an existing provider
pub async fn create_orchestrator_with_provider(
    config: &AppConfig,
    provider: Arc<dyn LlmProvider>,
    source: Arc<dyn DocumentSource>,
) -> anyhow::Result<Orchestrator> {
    let generation = &config.generation;
    let exemplars = load_exemplars(config).await?;

    let generator_for = |model: &str| -> Arc<dyn TextGenerator> {
        Arc::new(
            LlmGenerator::new(provider.clone(), model)
                .with_timeout(Duration::from_secs(generation.timeout_secs))
                .with_retry(generation.retry.clone()),
        )
    };

    let generator = generator_for(&generation.model);
    let classifier_generator = match &config.classification.model {
        Some(model) => generator_for(model),
        None => generator.clone(),
    };
    let classifier = ClassifierFactory::create(&config.classification, classifier_generator);

    let sampler = ConsistencySampler::new(
        generator.clone(),
        GenerationParams::new(generation.max_tokens, generation.temperature, generation.samples),
    )
    .with_max_concurrency(generation.max_concurrency);

    let sections = SectionProcessor::new(
        classifier,
        Arc::new(PromptBuilder::new(exemplars)),
        Arc::new(sampler),
    )
    .with_fallback(config.classification.fallback);

    let extractor = Arc::new(LlmExtractor::new(generator));
    let refiner = IterativeRefiner::new(
        extractor.clone(),
        Arc::new(ConfidenceEvaluator),
        Arc::new(config.pipeline.merge_strategy),
    )
    .with_config(
        RefinementConfig::new()
            .with_threshold(config.pipeline.confidence_threshold)
            .with_max_iterations(config.pipeline.max_iterations),
    );

    let segmenter =
        DocumentSegmenter::new(SectionVocabulary::new(&config.pipeline.section_headers));

    info!(
        provider = provider.provider_name(),
        model = %generation.model,
        classifier = ?config.classification.backend,
        samples = generation.samples,
        threshold = config.pipeline.confidence_threshold,
        "Pipeline ready"
    );

    Ok(Orchestrator::new(source, sections, extractor, refiner).with_segmenter(segmenter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::{Document, MockDocumentSource};

    #[tokio::test]
    async fn test_builtin_exemplars_are_complete() {
        assert!(load_exemplars(&AppConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_incomplete_exemplar_file_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("exemplars.toml");
        std::fs::write(&path, "factual = [\"Q: a\\nA: b\"]\n").unwrap();

        let mut config = AppConfig::default();
        config.prompting.exemplars_path = Some(path);

        let error = load_exemplars(&config).await.unwrap_err();
        assert!(error.is_fatal());
    }

    #[tokio::test]
    async fn test_missing_exemplar_file_is_fatal() {
        let mut config = AppConfig::default();
        config.prompting.exemplars_path = Some("/no/such/exemplars.toml".into());

        assert!(load_exemplars(&config).await.unwrap_err().is_fatal());
    }

    #[tokio::test]
    async fn test_wired_pipeline_answers_from_provider() {
        let provider = Arc::new(
            MockLlmProvider::new("openai")
                .with_multiple_choices()
                .with_text("Primary outcome was HbA1c."),
        );

        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .returning(|id| Ok(Document::new(id, "RESULTS\nHbA1c fell")));

        let mut config = AppConfig::default();
        config.generation.retry = domain::RetryPolicy::none();

        let orchestrator =
            create_orchestrator_with_provider(&config, provider.clone(), Arc::new(source))
                .await
                .unwrap();

        let answer = orchestrator
            .answer("What was the primary outcome?", &["trial.txt".to_string()])
            .await;

        // A single repeated completion has no agreement, so the record is refined
        assert!(!answer.satisfied);
        assert_eq!(answer.related_document.as_deref(), Some("trial.txt"));
        assert!(provider.call_count() > 0);
    }
}
