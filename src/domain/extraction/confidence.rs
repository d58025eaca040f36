//! Completeness scoring of an extraction record against a question

use std::fmt::Debug;

use super::ExtractedData;

/// Tolerance for weight sums such as 0.4 + 0.3 + 0.1
const SCORE_EPSILON: f64 = 1e-9;

/// A field the record should cover, with its share of the score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredField {
    pub name: &'static str,
    pub weight: f64,
    /// Asked when the field is missing
    pub follow_up: &'static str,
}

pub const REQUIRED_FIELDS: [RequiredField; 4] = [
    RequiredField {
        name: "study design",
        weight: 0.2,
        follow_up: "What is the study design?",
    },
    RequiredField {
        name: "outcomes",
        weight: 0.4,
        follow_up: "What were the primary and secondary outcomes?",
    },
    RequiredField {
        name: "statistical significance",
        weight: 0.3,
        follow_up: "What was the statistical significance of the results (p-values, confidence intervals)?",
    },
    RequiredField {
        name: "adverse events",
        weight: 0.1,
        follow_up: "What adverse events were reported?",
    },
];

/// Bonus when both the question and the summary talk about outcomes
pub const RELEVANCE_BONUS: f64 = 0.1;

/// Scores a record for a question; must be pure and in [0, 1]
pub trait ConfidenceScorer: Send + Sync + Debug {
    fn score(&self, data: &ExtractedData, question: &str) -> f64;
}

/// Weighted presence of the required fields plus the outcomes relevance bonus
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceEvaluator;

impl ConfidenceEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Unclamped sum of matched weights and bonus
    pub fn raw_score(&self, data: &ExtractedData, question: &str) -> f64 {
        let mut score: f64 = REQUIRED_FIELDS
            .iter()
            .filter(|field| data.mentions(field.name))
            .map(|field| field.weight)
            .sum();

        if question.to_lowercase().contains("outcomes")
            && data.description.to_lowercase().contains("outcomes")
        {
            score += RELEVANCE_BONUS;
        }

        score
    }

    /// Required fields not mentioned by any feature, in weight-table order
    pub fn missing_fields(&self, data: &ExtractedData) -> Vec<RequiredField> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !data.mentions(field.name))
            .copied()
            .collect()
    }
}

impl ConfidenceScorer for ConfidenceEvaluator {
    fn score(&self, data: &ExtractedData, question: &str) -> f64 {
        self.raw_score(data, question).clamp(0.0, 1.0)
    }
}

/// Whether a score clears the threshold, tolerating float summation error
pub fn meets_threshold(score: f64, threshold: f64) -> bool {
    score + SCORE_EPSILON >= threshold
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Returns scripted scores in order, repeating the last one
    #[derive(Debug)]
    pub struct ScriptedScorer {
        scores: Vec<f64>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedScorer {
        pub fn new(scores: &[f64]) -> Self {
            Self {
                scores: scores.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn constant(score: f64) -> Self {
            Self::new(&[score])
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Questions seen, in call order
        pub fn questions(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ConfidenceScorer for ScriptedScorer {
        fn score(&self, _data: &ExtractedData, question: &str) -> f64 {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len().min(self.scores.len().saturating_sub(1));
            calls.push(question.to_string());
            self.scores.get(index).copied().unwrap_or(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_fields() -> ExtractedData {
        ExtractedData::new("Trial summary")
            .with_feature("Study design", "randomized, double-blind")
            .with_feature("Primary outcomes", "remission at 12 months")
            .with_feature("Statistical significance", "p < 0.01")
            .with_feature("Adverse events", "nausea in 10%")
    }

    #[test]
    fn test_zero_matches_score_zero() {
        let data = ExtractedData::new("Trial").with_feature("Sample size", "200");
        assert_eq!(ConfidenceEvaluator.score(&data, "What is the dose?"), 0.0);
        assert_eq!(ConfidenceEvaluator.score(&ExtractedData::default(), ""), 0.0);
    }

    #[test]
    fn test_all_fields_sum_to_one_before_clamp() {
        let raw = ConfidenceEvaluator.raw_score(&all_fields(), "What is the dose?");
        assert!((raw - 1.0).abs() < 1e-9);
        assert!(ConfidenceEvaluator.score(&all_fields(), "What is the dose?") <= 1.0);
    }

    #[test]
    fn test_bonus_is_clamped() {
        let data = ExtractedData {
            description: "Outcomes were favourable".to_string(),
            ..all_fields()
        };
        let question = "What were the outcomes?";

        assert!(ConfidenceEvaluator.raw_score(&data, question) > 1.0);
        assert_eq!(ConfidenceEvaluator.score(&data, question), 1.0);
    }

    #[test]
    fn test_bonus_requires_both_question_and_description() {
        let data = ExtractedData::new("Outcomes summary").with_feature("Outcomes", "x");
        assert!((ConfidenceEvaluator.score(&data, "Outcomes?") - 0.5).abs() < 1e-9);
        assert!((ConfidenceEvaluator.score(&data, "Dose?") - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_partial_weights() {
        let data = ExtractedData::new("Trial")
            .with_feature("Outcomes", "x")
            .with_feature("Statistical significance", "p=0.03")
            .with_feature("adverse events", "none");
        let score = ConfidenceEvaluator.score(&data, "Dose?");

        assert!(score < 0.8);
        assert!(meets_threshold(score, 0.8));
    }

    #[test]
    fn test_missing_fields_in_table_order() {
        let data = ExtractedData::new("Trial").with_feature("Outcomes", "x");
        let missing: Vec<_> = ConfidenceEvaluator
            .missing_fields(&data)
            .iter()
            .map(|f| f.name)
            .collect();

        assert_eq!(
            missing,
            vec!["study design", "statistical significance", "adverse events"]
        );
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = REQUIRED_FIELDS.iter().map(|f| f.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
