use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::{AnthropicProvider, OpenAiProvider};
use crate::config::{GenerationBackend, GenerationConfig};
use crate::domain::{DomainError, LlmProvider};

/// Resolves the configured generation backend into a provider, once, at start-up
#[derive(Debug)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider, reading the API key from the configured environment variable
    pub fn create(config: &GenerationConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let var = config.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "Environment variable {} must hold the {:?} API key",
                    var, config.backend
                ))
            })?;

        Self::create_with_key(config, api_key)
    }

    /// Create the provider with an explicit API key
    pub fn create_with_key(
        config: &GenerationConfig,
        api_key: impl Into<String>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        // Transport timeout sits above the per-call generation timeout
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs + 5))?;

        let provider: Arc<dyn LlmProvider> = match (config.backend, config.base_url.as_deref()) {
            (GenerationBackend::OpenAi, Some(base_url)) => Arc::new(
                OpenAiProvider::with_base_url(http_client, api_key, base_url),
            ),
            (GenerationBackend::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
            (GenerationBackend::Anthropic, Some(base_url)) => Arc::new(
                AnthropicProvider::with_base_url(http_client, api_key, base_url),
            ),
            (GenerationBackend::Anthropic, None) => {
                Arc::new(AnthropicProvider::new(http_client, api_key))
            }
        };

        Ok(provider)
    }
}
