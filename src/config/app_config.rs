use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::extraction::MergeStrategy;
use crate::domain::llm::RetryPolicy;
use crate::domain::query::QueryType;
use crate::domain::refinement::MAX_ITERATIONS;
use crate::domain::{DomainError, document::DEFAULT_SECTION_HEADERS};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub generation: GenerationConfig,
    pub classification: ClassificationConfig,
    pub pipeline: PipelineConfig,
    pub prompting: PromptingConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Generation backends
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    #[default]
    OpenAi,
    Anthropic,
}

impl GenerationBackend {
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    pub model: String,
    /// Environment variable holding the API key; backend default when unset
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Candidate completions per section prompt
    pub samples: u32,
    pub timeout_secs: u64,
    /// Concurrent generation calls across all prompts
    pub max_concurrency: usize,
    pub retry: RetryPolicy,
}

impl GenerationConfig {
    pub fn api_key_var(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.backend.default_api_key_env())
    }
}

/// Classification backends
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationBackend {
    #[default]
    Keyword,
    Llm,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub backend: ClassificationBackend,
    /// Model for the `llm` backend; generation model when unset
    pub model: Option<String>,
    /// Category used when classification is unavailable
    pub fallback: Option<QueryType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub confidence_threshold: f64,
    pub max_iterations: u32,
    pub merge_strategy: MergeStrategy,
    pub section_headers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptingConfig {
    /// TOML file with `factual`, `comparative`, `inferential` arrays
    pub exemplars_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub articles_dir: PathBuf,
    pub questions_file: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::default(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: None,
            base_url: None,
            max_tokens: 500,
            temperature: 0.5,
            samples: 5,
            timeout_secs: 60,
            max_concurrency: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
            max_iterations: MAX_ITERATIONS,
            merge_strategy: MergeStrategy::default(),
            section_headers: DEFAULT_SECTION_HEADERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            articles_dir: PathBuf::from("data/articles"),
            questions_file: PathBuf::from("data/questions.json"),
            output_dir: PathBuf::from("data/outputs"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("TRIALQA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        let threshold = self.pipeline.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DomainError::configuration(format!(
                "pipeline.confidence_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        if self.pipeline.max_iterations == 0 || self.pipeline.max_iterations > MAX_ITERATIONS {
            return Err(DomainError::configuration(format!(
                "pipeline.max_iterations must be between 1 and {}, got {}",
                MAX_ITERATIONS, self.pipeline.max_iterations
            )));
        }

        if self.pipeline.section_headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DomainError::configuration(
                "pipeline.section_headers must name at least one header",
            ));
        }

        if self.generation.samples == 0 {
            return Err(DomainError::configuration("generation.samples must be at least 1"));
        }

        if self.generation.max_concurrency == 0 {
            return Err(DomainError::configuration(
                "generation.max_concurrency must be at least 1",
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "generation.timeout_secs must be at least 1",
            ));
        }

        if self.generation.model.trim().is_empty() {
            return Err(DomainError::configuration("generation.model must be set"));
        }

        Ok(())
    }
}
