//! Generation port backed by a chat-completion provider

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{
    DomainError, GenerationParams, LlmProvider, LlmRequest, RetryPolicy, TextGenerator,
};

pub const SYSTEM_PROMPT: &str = "You are a medical AI assistant.";

/// Run `operation`, retrying retryable failures with jittered exponential backoff
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, DomainError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                warn!(
                    attempt = attempt + 1,
                    max = policy.max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// [`TextGenerator`] over an [`LlmProvider`] with per-call timeout and retry
#[derive(Debug, Clone)]
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    call_timeout: Duration,
    retry: RetryPolicy,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            call_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request(&self, prompt: &str, params: &GenerationParams, n: u32) -> LlmRequest {
        LlmRequest::prompt(SYSTEM_PROMPT, prompt)
            .with_max_tokens(params.max_tokens)
            .with_temperature(params.temperature)
            .with_choices(n)
    }

    /// One provider call under the timeout, retried on transient failures
    async fn call(&self, request: LlmRequest) -> Result<Vec<String>, DomainError> {
        let provider = self.provider.provider_name();

        with_retry(&self.retry, || {
            let request = request.clone();
            async move {
                match timeout(self.call_timeout, self.provider.chat(&self.model, request)).await {
                    Ok(result) => result.map(|response| {
                        if response.truncated {
                            warn!(provider, model = %response.model, "Completion hit the token limit");
                        }
                        if let Some(usage) = response.usage {
                            debug!(provider, tokens = usage.total(), "Provider call finished");
                        }
                        response.texts()
                    }),
                    Err(_) => Err(DomainError::generation_transient(
                        provider,
                        format!("Request timed out after {}ms", self.call_timeout.as_millis()),
                    )),
                }
            }
        })
        .await
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, DomainError> {
        let samples = params.samples.max(1);

        let completions = if self.provider.supports_multiple_choices() {
            self.call(self.request(prompt, params, samples)).await?
        } else {
            let mut completions = Vec::with_capacity(samples as usize);
            for _ in 0..samples {
                completions.extend(self.call(self.request(prompt, params, 1)).await?);
            }
            completions
        };

        debug!(
            provider = self.provider.provider_name(),
            requested = samples,
            received = completions.len(),
            "Generated candidate completions"
        );

        Ok(completions)
    }

    fn generator_name(&self) -> &str {
        self.provider.provider_name()
    }
}
