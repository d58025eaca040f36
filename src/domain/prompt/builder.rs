//! Section-scoped few-shot prompt construction

use tracing::warn;

use super::ExemplarTable;
use crate::domain::DomainError;
use crate::domain::query::{Query, QueryType};

/// Composes one generation prompt per (query, section)
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    exemplars: ExemplarTable,
}

impl PromptBuilder {
    pub fn new(exemplars: ExemplarTable) -> Self {
        Self { exemplars }
    }

    pub fn exemplars(&self) -> &ExemplarTable {
        &self.exemplars
    }

    /// Section context line, section text, the category's exemplars, then the `Q:`/`A:` cue.
    ///
    /// Fails with [`DomainError::MissingExemplars`] when the category has no
    /// exemplar set.
    pub fn build(
        &self,
        query: &Query,
        category: QueryType,
        section_name: &str,
        section_text: &str,
    ) -> Result<String, DomainError> {
        let exemplars = self
            .exemplars
            .get(category)
            .ok_or_else(|| DomainError::missing_exemplars(category.as_str()))?;

        Ok(compose(query, section_name, section_text, Some(exemplars)))
    }

    /// Like [`build`](Self::build) but drops to an exemplar-free prompt when
    /// the category is unknown or has no exemplars.
    pub fn build_or_fallback(
        &self,
        query: &Query,
        category: Option<QueryType>,
        section_name: &str,
        section_text: &str,
    ) -> String {
        let Some(category) = category else {
            return compose(query, section_name, section_text, None);
        };

        match self.build(query, category, section_name, section_text) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("{}; building prompt without exemplars", e);
                compose(query, section_name, section_text, None)
            }
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(ExemplarTable::builtin())
    }
}

fn compose(
    query: &Query,
    section_name: &str,
    section_text: &str,
    exemplars: Option<&[String]>,
) -> String {
    let mut prompt = format!(
        "You are reading the {} section of a clinical trial.\n\nRelevant Section: {}\n\n",
        section_name, section_text
    );

    if let Some(exemplars) = exemplars {
        prompt.push_str(&exemplars.join("\n\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("Q: {}\nA:", query.text()));
    prompt
}
