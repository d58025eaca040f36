use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Classification unavailable: {message}")]
    ClassificationUnavailable { message: String },

    #[error("Document '{document}' has no recognized sections")]
    SegmentationEmpty { document: String },

    #[error("Generation failed: {provider} - {message}")]
    GenerationFailure {
        provider: String,
        message: String,
        retryable: bool,
    },

    #[error("Malformed generation output: {message}")]
    GenerationParse { message: String },

    #[error("No few-shot exemplars configured for category '{category}'")]
    MissingExemplars { category: String },

    #[error("No sections matched the {query_type} selection")]
    AggregationEmptySelection { query_type: String },

    #[error("Refinement exhausted after {iterations} iterations (confidence {confidence:.2})")]
    IterationExhausted { iterations: u32, confidence: f64 },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn classification_unavailable(message: impl Into<String>) -> Self {
        Self::ClassificationUnavailable {
            message: message.into(),
        }
    }

    pub fn segmentation_empty(document: impl Into<String>) -> Self {
        Self::SegmentationEmpty {
            document: document.into(),
        }
    }

    /// Transport-level failure that is worth retrying (timeouts, throttling, 5xx)
    pub fn generation_transient(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            provider: provider.into(),
            message: message.into(),
            retryable: true,
        }
    }

    /// Failure that will not go away on retry (bad credentials, malformed request)
    pub fn generation_fatal(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            provider: provider.into(),
            message: message.into(),
            retryable: false,
        }
    }

    pub fn generation_parse(message: impl Into<String>) -> Self {
        Self::GenerationParse {
            message: message.into(),
        }
    }

    pub fn missing_exemplars(category: impl Into<String>) -> Self {
        Self::MissingExemplars {
            category: category.into(),
        }
    }

    pub fn aggregation_empty_selection(query_type: impl Into<String>) -> Self {
        Self::AggregationEmptySelection {
            query_type: query_type.into(),
        }
    }

    pub fn iteration_exhausted(iterations: u32, confidence: f64) -> Self {
        Self::IterationExhausted {
            iterations,
            confidence,
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::GenerationFailure { retryable: true, .. })
    }

    /// Errors that must abort start-up instead of degrading a single section or document
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::MissingExemplars { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Document 'trial-7' not found");
        assert_eq!(error.to_string(), "Not found: Document 'trial-7' not found");
    }

    #[test]
    fn test_generation_failure_retryability() {
        let transient = DomainError::generation_transient("openai", "HTTP 429");
        let fatal = DomainError::generation_fatal("openai", "HTTP 401");

        assert!(transient.is_retryable());
        assert!(!fatal.is_retryable());
        assert_eq!(fatal.to_string(), "Generation failed: openai - HTTP 401");
    }

    #[test]
    fn test_parse_error_is_not_retryable() {
        let error = DomainError::generation_parse("expected value at line 1");
        assert!(!error.is_retryable());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(DomainError::configuration("unknown backend").is_fatal());
        assert!(DomainError::missing_exemplars("factual").is_fatal());
        assert!(!DomainError::segmentation_empty("doc").is_fatal());
    }

    #[test]
    fn test_iteration_exhausted_message() {
        let error = DomainError::iteration_exhausted(5, 0.3);
        assert_eq!(
            error.to_string(),
            "Refinement exhausted after 5 iterations (confidence 0.30)"
        );
    }
}
