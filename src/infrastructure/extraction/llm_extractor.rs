//! Structured extraction through the generation port

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::llm::extract_json;
use crate::domain::{
    DomainError, ExtractedData, ExtractionSchemaValidator, Extractor, GenerationParams,
    PromptTemplate, RecordValidator, TextGenerator,
};

pub const INITIAL_TEMPLATE: &str = r#"Perform a detailed extraction from the following clinical trial document to answer the user's query.

Document:
${var:document}

User Query:
${var:query}

Extract the following information:
- Study design
- Number of participants
- Interventions (detailed)
- Outcomes (primary and secondary)
- Statistical significance (p-values, confidence intervals)
- Adverse events
- Metadata (authors, publication date, journal)

Provide the output in this JSON format:
{
  "description": "<summary>",
  "metadata": {
    "authors": ["<author1>", "<author2>"],
    "publication_date": "<date>",
    "journal": "<journal_name>"
  },
  "extracted_features": [
    {
      "description": "<feature_description>",
      "value": "<value>"
    }
  ]
}
Ensure the output is valid JSON and includes all required fields."#;

pub const FOLLOW_UP_TEMPLATE: &str = r#"The question is: ${var:question}

Previously extracted data: ${var:current}

The document is:
"""${var:document}"""

Use the information to extract missing data and update the extracted features in the same JSON format."#;

/// [`Extractor`] that prompts for a JSON record and parses the reply
#[derive(Debug, Clone)]
pub struct LlmExtractor {
    generator: Arc<dyn TextGenerator>,
    validator: Arc<dyn RecordValidator>,
    params: GenerationParams,
    initial: PromptTemplate,
    follow_up: PromptTemplate,
}

impl LlmExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            validator: Arc::new(ExtractionSchemaValidator),
            params: GenerationParams::new(1000, 0.2, 1),
            initial: PromptTemplate::parse(INITIAL_TEMPLATE),
            follow_up: PromptTemplate::parse(FOLLOW_UP_TEMPLATE),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn RecordValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Sample count is forced to one
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params.with_samples(1);
        self
    }

    async fn run(&self, prompt: String) -> Result<ExtractedData, DomainError> {
        let replies = self.generator.generate(&prompt, &self.params).await?;
        let reply = replies
            .first()
            .ok_or_else(|| DomainError::generation_parse("Extraction returned no completion"))?;

        self.parse(reply)
    }

    fn parse(&self, reply: &str) -> Result<ExtractedData, DomainError> {
        let json = extract_json(reply).ok_or_else(|| {
            DomainError::generation_parse("Extraction reply contained no JSON object")
        })?;

        let value: Value = serde_json::from_str(json)
            .map_err(|e| DomainError::generation_parse(format!("Invalid extraction JSON: {}", e)))?;

        let report = self.validator.validate(&value);
        if !report.valid {
            warn!(errors = ?report.errors, "Extraction record failed validation");
        }

        let data: ExtractedData = serde_json::from_value(value).map_err(|e| {
            DomainError::generation_parse(format!("Extraction record has the wrong shape: {}", e))
        })?;

        debug!(
            features = data.extracted_features.len(),
            "Parsed extraction record"
        );

        Ok(data)
    }
}

#[async_trait]
impl Extractor for LlmExtractor {
    async fn initial(&self, document: &str, query: &str) -> Result<ExtractedData, DomainError> {
        let values = HashMap::from([
            ("document", document.to_string()),
            ("query", query.to_string()),
        ]);

        self.run(self.initial.render(&values)?).await
    }

    async fn extract(
        &self,
        document: &str,
        current: &ExtractedData,
        question: &str,
    ) -> Result<ExtractedData, DomainError> {
        let current = serde_json::to_string_pretty(current)
            .map_err(|e| DomainError::internal(format!("Failed to encode record: {}", e)))?;

        let values = HashMap::from([
            ("document", document.to_string()),
            ("question", question.to_string()),
            ("current", current),
        ]);

        self.run(self.follow_up.render(&values)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::ScriptedGenerator;

    const RECORD: &str = r#"Here is the extraction:
```json
{
  "description": "Phase III trial of drug X",
  "metadata": {"authors": ["Lee", "Park"], "publication_date": "2021-04-01", "journal": "NEJM"},
  "extracted_features": [
    {"description": "Study design", "value": "randomized, double-blind"},
    {"description": "Number of participants", "value": 412}
  ]
}
```"#;

    #[tokio::test]
    async fn test_initial_extraction_parses_record() {
        let generator = Arc::new(ScriptedGenerator::new().with_fallback(&[RECORD]));
        let extractor = LlmExtractor::new(generator.clone());

        let data = extractor
            .initial("METHODS\nRandomized trial", "What was the design?")
            .await
            .unwrap();

        assert_eq!(data.description, "Phase III trial of drug X");
        assert_eq!(data.metadata.journal.as_deref(), Some("NEJM"));
        assert_eq!(data.extracted_features[1].value, "412");

        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("Document:\nMETHODS\nRandomized trial"));
        assert!(prompt.contains("User Query:\nWhat was the design?"));
        assert!(prompt.contains("\"extracted_features\": ["));
    }

    #[tokio::test]
    async fn test_follow_up_prompt_carries_current_record() {
        let generator = Arc::new(ScriptedGenerator::new().with_fallback(&[RECORD]));
        let extractor = LlmExtractor::new(generator.clone());
        let current = ExtractedData::new("prior").with_feature("Outcomes", "HbA1c -1.2%");

        extractor
            .extract("doc text", &current, "What adverse events were reported?")
            .await
            .unwrap();

        let prompt = &generator.prompts()[0];
        assert!(prompt.starts_with("The question is: What adverse events were reported?"));
        assert!(prompt.contains("HbA1c -1.2%"));
        assert!(prompt.contains("\"\"\"doc text\"\"\""));
    }

    #[tokio::test]
    async fn test_document_placeholders_are_not_expanded() {
        let generator = Arc::new(ScriptedGenerator::new().with_fallback(&[RECORD]));
        let extractor = LlmExtractor::new(generator.clone());

        extractor.initial("see ${var:query}", "q").await.unwrap();

        assert!(generator.prompts()[0].contains("see ${var:query}"));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_parse_error() {
        for reply in ["no json here", "{\"description\": ", "{\"extracted_features\": 3}"] {
            let generator = Arc::new(ScriptedGenerator::new().with_fallback(&[reply]));
            let extractor = LlmExtractor::new(generator);

            let error = extractor.initial("doc", "q").await.unwrap_err();
            assert!(
                matches!(error, DomainError::GenerationParse { .. }),
                "reply {:?} gave {:?}",
                reply,
                error
            );
        }
    }

    #[tokio::test]
    async fn test_empty_reply_list_is_parse_error() {
        let generator = Arc::new(ScriptedGenerator::new());
        let extractor = LlmExtractor::new(generator);

        let error = extractor.initial("doc", "q").await.unwrap_err();
        assert!(matches!(error, DomainError::GenerationParse { .. }));
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let generator = Arc::new(ScriptedGenerator::new().failing_on("User Query", "down"));
        let extractor = LlmExtractor::new(generator);

        let error = extractor.initial("doc", "q").await.unwrap_err();
        assert!(matches!(error, DomainError::GenerationFailure { .. }));
    }
}
