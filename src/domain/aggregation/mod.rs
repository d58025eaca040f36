//! Query-type-aware selection over per-section results
//!
//! - factual: the single best-agreeing section
//! - comparative: RESULTS / ADVERSE EVENTS, else the best section
//! - inferential: DISCUSSION and RESULTS combined into one answer, or an
//!   explicit no-combination result when DISCUSSION is missing
//! - unclassified: every section unchanged

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::domain::query::QueryType;

/// Answer produced for one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section: String,
    /// `None` when classification was unavailable
    pub query_type: Option<QueryType>,
    pub consistency_score: f64,
    pub response: String,
}

impl SectionResult {
    pub fn new(
        section: impl Into<String>,
        query_type: Option<QueryType>,
        consistency_score: f64,
        response: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            query_type,
            consistency_score,
            response: response.into(),
        }
    }
}

/// Section name to result, in section order
pub type SectionResults = IndexMap<String, SectionResult>;

/// Several sections merged into one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnswer {
    pub query_type: QueryType,
    pub consistency_score: f64,
    pub response: String,
    /// Contributing sections in order
    pub sections: Vec<String>,
}

/// Outcome of aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregatedResult {
    Sections { results: SectionResults },
    Combined(CombinedAnswer),
    NoCombination { query_type: QueryType, reason: String },
}

impl AggregatedResult {
    /// Mean consistency of the selected sections; zero when nothing was selected
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Sections { results } => {
                if results.is_empty() {
                    0.0
                } else {
                    let total: f64 = results.values().map(|r| r.consistency_score).sum();
                    (total / results.len() as f64).clamp(0.0, 1.0)
                }
            }
            Self::Combined(combined) => combined.consistency_score,
            Self::NoCombination { .. } => 0.0,
        }
    }

    /// Selected answer text, sections joined by a space
    pub fn answer(&self) -> Option<String> {
        match self {
            Self::Sections { results } if !results.is_empty() => Some(
                results
                    .values()
                    .map(|r| r.response.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Self::Combined(combined) => Some(combined.response.clone()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sections { results } => results.is_empty(),
            Self::Combined(_) => false,
            Self::NoCombination { .. } => true,
        }
    }
}

/// Section names preferred per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    pub comparative_sections: Vec<String>,
    pub inferential_sections: Vec<String>,
    /// Sections an inferential answer cannot be combined without
    pub inferential_required: Vec<String>,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            comparative_sections: vec!["RESULTS".to_string(), "ADVERSE EVENTS".to_string()],
            inferential_sections: vec!["DISCUSSION".to_string(), "RESULTS".to_string()],
            inferential_required: vec!["DISCUSSION".to_string()],
        }
    }
}

impl AggregationPolicy {
    pub fn aggregate(
        &self,
        results: SectionResults,
        query_type: Option<QueryType>,
    ) -> AggregatedResult {
        if results.is_empty() {
            return AggregatedResult::Sections { results };
        }

        match query_type {
            Some(QueryType::Factual) => best_section(results),
            Some(QueryType::Comparative) => {
                let selected = select(&results, &self.comparative_sections);
                if selected.is_empty() {
                    debug!("No comparative sections present, using best section");
                    best_section(results)
                } else {
                    AggregatedResult::Sections { results: selected }
                }
            }
            Some(QueryType::Inferential) => {
                let missing = self
                    .inferential_required
                    .iter()
                    .any(|required| !results.keys().any(|name| name.eq_ignore_ascii_case(required)));
                if missing {
                    return no_combination(QueryType::Inferential);
                }
                combine(select(&results, &self.inferential_sections), QueryType::Inferential)
            }
            None => AggregatedResult::Sections { results },
        }
    }
}

/// Aggregate with the default section policy
pub fn aggregate(results: SectionResults, query_type: Option<QueryType>) -> AggregatedResult {
    AggregationPolicy::default().aggregate(results, query_type)
}

/// Strict maximum, so the first of equal scores wins
fn best_section(results: SectionResults) -> AggregatedResult {
    let mut best: Option<(&String, &SectionResult)> = None;
    for (name, result) in &results {
        match best {
            Some((_, current)) if result.consistency_score <= current.consistency_score => {}
            _ => best = Some((name, result)),
        }
    }

    let mut selected = SectionResults::new();
    if let Some((name, result)) = best {
        selected.insert(name.clone(), result.clone());
    }
    AggregatedResult::Sections { results: selected }
}

fn select(results: &SectionResults, names: &[String]) -> SectionResults {
    results
        .iter()
        .filter(|(name, _)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
        .map(|(name, result)| (name.clone(), result.clone()))
        .collect()
}

fn no_combination(query_type: QueryType) -> AggregatedResult {
    let error = DomainError::aggregation_empty_selection(query_type.as_str());
    warn!("{}", error);
    AggregatedResult::NoCombination {
        query_type,
        reason: error.to_string(),
    }
}

fn combine(selected: SectionResults, query_type: QueryType) -> AggregatedResult {
    if selected.is_empty() {
        return no_combination(query_type);
    }

    let total: f64 = selected.values().map(|r| r.consistency_score).sum();
    let response = selected
        .values()
        .map(|r| r.response.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    AggregatedResult::Combined(CombinedAnswer {
        query_type,
        consistency_score: total / selected.len() as f64,
        response,
        sections: selected.keys().cloned().collect(),
    })
}
