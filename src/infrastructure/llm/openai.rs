use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, MessageRole};

const OPENAI_API: &str = "https://api.openai.com";

/// Chat-completions backend; returns every requested choice from one call
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    bearer: String,
    endpoint: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, OPENAI_API)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            bearer: format!("Bearer {}", api_key.into()),
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    fn body<'a>(model: &'a str, request: &'a LlmRequest) -> CompletionBody<'a> {
        CompletionBody {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: (request.n > 1).then_some(request.n),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = serde_json::to_value(Self::body(model, &request))
            .map_err(|e| DomainError::internal(format!("openai: unencodable request: {}", e)))?;

        let headers = vec![
            ("Authorization", self.bearer.as_str()),
            ("Content-Type", "application/json"),
        ];
        let raw = self.client.post_json(&self.endpoint, headers, &body).await?;

        let completion: Completion = serde_json::from_value(raw).map_err(|e| {
            DomainError::generation_parse(format!("openai: unexpected response shape: {}", e))
        })?;

        if completion.choices.is_empty() {
            return Err(DomainError::generation_fatal("openai", "Response carried no choices"));
        }

        let truncated = completion
            .choices
            .iter()
            .any(|c| c.finish_reason.as_deref() == Some("length"));

        let mut response = LlmResponse::new(completion.id, completion.model)
            .with_completions(
                completion
                    .choices
                    .into_iter()
                    .map(|c| c.message.content.unwrap_or_default()),
            )
            .truncated(truncated);

        if let Some(usage) = completion.usage {
            response = response.with_usage(usage.prompt_tokens, usage.completion_tokens);
        }

        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn supports_multiple_choices(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct Completion {
    id: String,
    model: String,
    choices: Vec<Choice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
