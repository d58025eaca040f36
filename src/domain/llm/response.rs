use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Completions returned by one provider call, in provider order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub id: String,
    pub model: String,
    pub completions: Vec<String>,
    /// Any completion stopped on the token limit
    pub truncated: bool,
    pub usage: Option<Usage>,
}

impl LlmResponse {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            completions: Vec::new(),
            truncated: false,
            usage: None,
        }
    }

    pub fn with_completion(mut self, text: impl Into<String>) -> Self {
        self.completions.push(text.into());
        self
    }

    pub fn with_completions<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completions.extend(texts.into_iter().map(Into::into));
        self
    }

    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.usage = Some(Usage {
            input_tokens,
            output_tokens,
        });
        self
    }

    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// Trimmed completion texts
    pub fn texts(&self) -> Vec<String> {
        self.completions.iter().map(|c| c.trim().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_are_trimmed_in_order() {
        let response = LlmResponse::new("id-1", "gpt-4o-mini")
            .with_completions([" 200 participants ", "200 participants."])
            .with_usage(10, 20);

        assert_eq!(response.texts(), vec!["200 participants", "200 participants."]);
        assert_eq!(response.usage.map(|u| u.total()), Some(30));
        assert!(!response.truncated);
    }
}
