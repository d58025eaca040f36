//! LLM provider implementations and the generation adapter

mod anthropic;
mod factory;
mod generator;
mod http_client;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use generator::{LlmGenerator, SYSTEM_PROMPT, with_retry};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
