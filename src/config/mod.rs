//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClassificationBackend, ClassificationConfig, GenerationBackend, GenerationConfig,
    LogFormat, LoggingConfig, PathsConfig, PipelineConfig, PromptingConfig,
};
