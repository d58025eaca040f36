//! Query domain
//!
//! A query is free text plus the intent category that drives prompting and
//! aggregation. Classification backends are behind [`QueryClassifier`].

mod classifier;

pub use classifier::{LabelDistribution, LabelScore, QueryClassifier, classify_query};

#[cfg(test)]
pub use classifier::mock::MockQueryClassifier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Intent category of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Factual,
    Comparative,
    Inferential,
}

impl QueryType {
    /// All categories in label-index order
    pub const ALL: [QueryType; 3] = [Self::Factual, Self::Comparative, Self::Inferential];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Comparative => "comparative",
            Self::Inferential => "inferential",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "factual" => Ok(Self::Factual),
            "comparative" => Ok(Self::Comparative),
            "inferential" => Ok(Self::Inferential),
            other => Err(DomainError::validation(format!(
                "Unknown query type '{}'",
                other
            ))),
        }
    }
}

/// A normalized question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
}

impl Query {
    /// Trim and collapse internal whitespace; case is kept so drug names survive
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalization() {
        let query = Query::new("  How does  Drug A\ncompare to Drug B? ");
        assert_eq!(query.text(), "How does Drug A compare to Drug B?");
    }

    #[test]
    fn test_query_type_parse() {
        assert_eq!("Factual".parse::<QueryType>().unwrap(), QueryType::Factual);
        assert_eq!(
            " inferential ".parse::<QueryType>().unwrap(),
            QueryType::Inferential
        );
        assert!("speculative".parse::<QueryType>().is_err());
    }

    #[test]
    fn test_query_type_serde() {
        let json = serde_json::to_string(&QueryType::Comparative).unwrap();
        assert_eq!(json, "\"comparative\"");
    }
}
