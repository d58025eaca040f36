use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, MessageRole};

const ANTHROPIC_API: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Messages-API backend. One completion per call, so the generator loops for samples.
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    endpoint: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, ANTHROPIC_API)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
        }
    }

    fn body<'a>(model: &'a str, request: &'a LlmRequest) -> MessagesBody<'a> {
        MessagesBody {
            model,
            system: request.system_text(),
            messages: request
                .turns()
                .map(|m| Turn {
                    role: if m.role == MessageRole::Assistant {
                        "assistant"
                    } else {
                        "user"
                    },
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = serde_json::to_value(Self::body(model, &request))
            .map_err(|e| DomainError::internal(format!("anthropic: unencodable request: {}", e)))?;

        let headers = vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", API_VERSION),
            ("Content-Type", "application/json"),
        ];
        let raw = self.client.post_json(&self.endpoint, headers, &body).await?;

        let reply: Reply = serde_json::from_value(raw).map_err(|e| {
            DomainError::generation_parse(format!("anthropic: unexpected response shape: {}", e))
        })?;

        let text: String = reply
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        Ok(LlmResponse::new(reply.id, reply.model)
            .with_completion(text)
            .truncated(reply.stop_reason.as_deref() == Some("max_tokens"))
            .with_usage(reply.usage.input_tokens, reply.usage.output_tokens))
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Turn<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct Reply {
    id: String,
    model: String,
    content: Vec<Block>,
    stop_reason: Option<String>,
    usage: ReplyUsage,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyUsage {
    input_tokens: u32,
    output_tokens: u32,
}
