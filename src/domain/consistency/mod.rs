//! Agreement scoring over sampled completions
//!
//! Candidates are deduplicated by exact text before scoring. Fewer than two
//! distinct candidates score zero: a model that keeps repeating itself has
//! not shown agreement, only lack of diversity.

mod similarity;

pub use similarity::TfIdfVectorizer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Candidate completions for one prompt with their agreement score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub candidates: Vec<String>,
    pub consistency: f64,
    pub representative: String,
}

impl SampleSet {
    pub fn from_candidates(candidates: Vec<String>) -> Self {
        let consistency = consistency_score(&candidates);
        let representative = select_representative(&candidates).unwrap_or_default();

        Self {
            candidates,
            consistency,
            representative,
        }
    }
}

/// Mean pairwise cosine similarity over distinct, non-blank candidates
pub fn consistency_score(candidates: &[String]) -> f64 {
    let mut distinct: Vec<&str> = Vec::new();
    for candidate in candidates {
        if candidate.trim().is_empty() {
            continue;
        }
        if !distinct.contains(&candidate.as_str()) {
            distinct.push(candidate.as_str());
        }
    }

    if distinct.len() <= 1 {
        return 0.0;
    }

    let vectors = TfIdfVectorizer::fit(&distinct).transform();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            total += similarity::cosine(&vectors[i], &vectors[j]);
            pairs += 1;
        }
    }

    (total / pairs as f64).clamp(0.0, 1.0)
}

/// Most frequent raw candidate; ties go to the one seen first
pub fn select_representative(candidates: &[String]) -> Option<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for candidate in candidates {
        *counts.entry(candidate.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (text, count) in counts {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((text, count)),
        }
    }

    best.map(|(text, _)| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_candidates_score_zero() {
        let candidates = owned(&["Drug A reduced symptoms by 70%."; 5]);
        assert_eq!(consistency_score(&candidates), 0.0);
    }

    #[test]
    fn test_single_or_empty_set_scores_zero() {
        assert_eq!(consistency_score(&[]), 0.0);
        assert_eq!(consistency_score(&owned(&["only one"])), 0.0);
        assert_eq!(consistency_score(&owned(&["   ", "answer"])), 0.0);
    }

    #[test]
    fn test_disjoint_candidates_score_near_zero() {
        let score = consistency_score(&owned(&["aspirin", "placebo"]));
        assert!(score.abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_whitespace_variants_score_between_zero_and_one() {
        let score = consistency_score(&owned(&[
            "The drug reduced pain.",
            "The drug  reduced pain.",
        ]));
        assert!(score > 0.0 && score < 1.0, "score was {score}");
    }

    #[test]
    fn test_similar_answers_score_higher_than_unrelated() {
        let similar = consistency_score(&owned(&[
            "The study included 200 participants.",
            "The study enrolled 200 participants.",
        ]));
        let unrelated = consistency_score(&owned(&[
            "The study included 200 participants.",
            "Nausea was the most common adverse event.",
        ]));
        assert!(similar > unrelated);
    }

    #[test]
    fn test_representative_is_most_frequent() {
        let candidates = owned(&["b", "a", "b", "c"]);
        assert_eq!(select_representative(&candidates).as_deref(), Some("b"));
    }

    #[test]
    fn test_representative_tie_prefers_first_seen() {
        let candidates = owned(&["x", "y", "y", "x"]);
        assert_eq!(select_representative(&candidates).as_deref(), Some("x"));
        assert!(select_representative(&[]).is_none());
    }

    #[test]
    fn test_sample_set() {
        let set = SampleSet::from_candidates(owned(&["yes", "yes", "no"]));
        assert_eq!(set.representative, "yes");
        assert_eq!(set.candidates.len(), 3);
        assert!((0.0..=1.0).contains(&set.consistency));
    }
}
