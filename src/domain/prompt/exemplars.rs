//! Few-shot exemplar table keyed by query category

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::query::QueryType;

const FACTUAL: &[&str] = &[
    "Q: What is the sample size?\nA: The study included 200 participants.",
    "Q: What was the primary endpoint?\nA: The primary endpoint was the proportion of patients achieving remission after 12 months.",
    "Q: What was the dosage of Drug A?\nA: Participants received 50mg of Drug A daily.",
    "Q: What is the follow-up period?\nA: The follow-up period was 5 years.",
    "Q: What is the study design?\nA: This was a randomized, double-blind, placebo-controlled trial with a sample size of 500 participants.",
    "Q: How many participants reported adverse events?\nA: 35% of participants reported mild adverse events, including nausea and headaches.",
];

const COMPARATIVE: &[&str] = &[
    "Q: How does the efficacy of Drug A compare to Drug B?\nA: Drug A showed a 25% improvement in symptom reduction compared to 15% for Drug B over 12 months.",
    "Q: Compare the adverse events between Drug X and Drug Y.\nA: Drug X had fewer adverse events compared to Drug Y (15% vs. 25% respectively).",
    "Q: Compare the remission rates of Drug A and Drug B.\nA: Drug A showed a 40% remission rate, while Drug B showed a 35% remission rate.",
    "Q: How do the safety profiles of Drug E and Drug F differ in elderly patients?\nA: Drug E had fewer gastrointestinal side effects (10% vs. 20%) compared to Drug F.",
];

const INFERENTIAL: &[&str] = &[
    "Q: Predict the long-term impact of Drug C on remission rates.\nA: Based on trial data, Drug C is expected to maintain a remission rate of 65% over 5 years.",
    "Q: What are the potential long-term side effects of Drug D?\nA: Long-term use of Drug D may increase the risk of cardiovascular events by 10%.",
    "Q: What is the predicted efficacy over 5 years?\nA: Based on the data, the efficacy is expected to remain above 70% over 5 years.",
    "Q: Can we infer any correlation between dosage adjustments and reduction in adverse events for Drug D?\nA: The trial suggests that reducing the dosage of Drug D by 25% leads to a 10% reduction in adverse event frequency.",
];

/// On-disk exemplar file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExemplarFile {
    factual: Vec<String>,
    comparative: Vec<String>,
    inferential: Vec<String>,
}

/// Worked Q/A examples per category
#[derive(Debug, Clone, Default)]
pub struct ExemplarTable {
    entries: HashMap<QueryType, Vec<String>>,
}

impl ExemplarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in clinical-trial examples for every category
    pub fn builtin() -> Self {
        Self::new()
            .with_category(QueryType::Factual, FACTUAL.iter().map(|s| s.to_string()))
            .with_category(QueryType::Comparative, COMPARATIVE.iter().map(|s| s.to_string()))
            .with_category(QueryType::Inferential, INFERENTIAL.iter().map(|s| s.to_string()))
    }

    /// Parse a TOML document with `factual`, `comparative` and `inferential` arrays
    pub fn from_toml(source: &str) -> Result<Self, DomainError> {
        let file: ExemplarFile = toml::from_str(source).map_err(|e| {
            DomainError::configuration(format!("Invalid exemplar file: {}", e))
        })?;

        Ok(Self::new()
            .with_category(QueryType::Factual, file.factual)
            .with_category(QueryType::Comparative, file.comparative)
            .with_category(QueryType::Inferential, file.inferential))
    }

    /// Empty sets are not recorded
    pub fn with_category(
        mut self,
        category: QueryType,
        exemplars: impl IntoIterator<Item = String>,
    ) -> Self {
        let exemplars: Vec<String> = exemplars
            .into_iter()
            .filter(|e| !e.trim().is_empty())
            .collect();

        if exemplars.is_empty() {
            self.entries.remove(&category);
        } else {
            self.entries.insert(category, exemplars);
        }
        self
    }

    pub fn get(&self, category: QueryType) -> Option<&[String]> {
        self.entries.get(&category).map(Vec::as_slice)
    }

    /// Fails when any category lacks exemplars
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        match QueryType::ALL.iter().find(|c| self.get(**c).is_none()) {
            Some(category) => Err(DomainError::missing_exemplars(category.as_str())),
            None => Ok(()),
        }
    }
}
