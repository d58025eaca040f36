//! LLM domain models and the generation port

mod generator;
mod message;
mod provider;
mod request;
mod response;
mod retry;

pub use generator::{GenerationParams, TextGenerator};
pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::LlmRequest;
pub use response::{LlmResponse, Usage};
pub use retry::RetryPolicy;

#[cfg(test)]
pub use generator::mock::ScriptedGenerator;
#[cfg(test)]
pub use provider::mock::MockLlmProvider;

/// Extract the outermost JSON object from model output (handles prose and code fences)
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}
