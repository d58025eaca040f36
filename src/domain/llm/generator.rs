//! Generation port: prompt in, ordered candidate completions out

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of candidate completions to request
    pub samples: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.5,
            samples: 1,
        }
    }
}

impl GenerationParams {
    pub fn new(max_tokens: u32, temperature: f32, samples: u32) -> Self {
        Self {
            max_tokens,
            temperature,
            samples,
        }
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Capability that turns a prompt into `samples` completion strings.
///
/// Implementations must keep provider order and must report transient
/// failures with a retryable [`DomainError::GenerationFailure`].
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, DomainError>;

    /// Name of the backing provider, for logs
    fn generator_name(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct Rule {
        needle: String,
        outcome: Result<Vec<String>, String>,
        delay: Option<Duration>,
    }

    /// Generator whose replies are chosen by substring match on the prompt
    #[derive(Debug, Default)]
    pub struct ScriptedGenerator {
        rules: Vec<Rule>,
        fallback: Vec<String>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_fallback(mut self, replies: &[&str]) -> Self {
            self.fallback = replies.iter().map(|r| r.to_string()).collect();
            self
        }

        pub fn on(mut self, needle: &str, replies: &[&str]) -> Self {
            self.rules.push(Rule {
                needle: needle.to_string(),
                outcome: Ok(replies.iter().map(|r| r.to_string()).collect()),
                delay: None,
            });
            self
        }

        pub fn on_delayed(mut self, needle: &str, replies: &[&str], delay: Duration) -> Self {
            self.rules.push(Rule {
                needle: needle.to_string(),
                outcome: Ok(replies.iter().map(|r| r.to_string()).collect()),
                delay: Some(delay),
            });
            self
        }

        pub fn failing_on(mut self, needle: &str, message: &str) -> Self {
            self.rules.push(Rule {
                needle: needle.to_string(),
                outcome: Err(message.to_string()),
                delay: None,
            });
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn peak_in_flight(&self) -> usize {
            self.peak_in_flight.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<Vec<String>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());

            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

            let rule = self.rules.iter().find(|r| prompt.contains(&r.needle));
            let delay = rule.and_then(|r| r.delay).unwrap_or(Duration::from_millis(1));
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match rule {
                Some(Rule {
                    outcome: Ok(replies),
                    ..
                }) => Ok(replies.clone()),
                Some(Rule {
                    outcome: Err(message),
                    ..
                }) => Err(DomainError::generation_fatal("scripted", message.clone())),
                None => Ok(self.fallback.clone()),
            }
        }

        fn generator_name(&self) -> &str {
            "scripted"
        }
    }
}
