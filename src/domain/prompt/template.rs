//! Placeholder templates for section and extraction prompts
//!
//! `${var:document}` must be supplied at render time; `${var:style:brief}`
//! falls back to `brief`. Substitution happens in one pass, so inserted
//! document text or JSON is never scanned for placeholders again.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::DomainError;

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)(?::([^}]*))?\}")
        .expect("variable pattern is a valid regex")
});

/// A variable declared by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    pub name: String,
    pub default: Option<String>,
}

impl PromptVariable {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Template text plus the placeholders it declares
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse a template string and collect its variables (first declaration wins)
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut seen = HashSet::new();
        let mut variables = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();
            if !seen.insert(name.clone()) {
                continue;
            }
            variables.push(PromptVariable {
                name,
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }

        Self { content, variables }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    /// Render with the given values, falling back to declared defaults
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, DomainError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.is_required() && !values.contains_key(v.name.as_str()))
        {
            return Err(DomainError::validation(format!(
                "Missing required template variable: {}",
                missing.name
            )));
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures<'_>| {
            values
                .get(&cap[1])
                .cloned()
                .or_else(|| cap.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        let template = PromptTemplate::parse(
            "Question: ${var:question}\nFormat: ${var:format:json}\nAgain ${var:question}",
        );

        assert_eq!(template.variables().len(), 2);
        assert!(template.variables()[0].is_required());
        assert_eq!(template.variables()[1].default.as_deref(), Some("json"));
    }

    #[test]
    fn test_render_with_default() {
        let template = PromptTemplate::parse("Q: ${var:question} (${var:format:json})");
        let values = HashMap::from([("question", "What is the dose?".to_string())]);

        assert_eq!(
            template.render(&values).unwrap(),
            "Q: What is the dose? (json)"
        );
    }

    #[test]
    fn test_render_missing_required_variable() {
        let template = PromptTemplate::parse("Document: ${var:document}");
        let result = template.render(&HashMap::new());

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_render_does_not_expand_values() {
        let template = PromptTemplate::parse("${var:document} / ${var:question}");
        let values = HashMap::from([
            ("document", "text with ${var:question} inside".to_string()),
            ("question", "Q".to_string()),
        ]);

        assert_eq!(
            template.render(&values).unwrap(),
            "text with ${var:question} inside / Q"
        );
    }
}
