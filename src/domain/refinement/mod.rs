//! Confidence-driven iterative refinement

mod refiner;

pub use refiner::IterativeRefiner;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::extraction::{ExtractedData, meets_threshold};

/// Hard upper bound on refinement iterations
pub const MAX_ITERATIONS: u32 = 5;

/// Refinement state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementState {
    Initial,
    Evaluating,
    Extracting,
    Satisfied,
    Exhausted,
}

impl RefinementState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Satisfied | Self::Exhausted)
    }
}

impl fmt::Display for RefinementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Evaluating => "evaluating",
            Self::Extracting => "extracting",
            Self::Satisfied => "satisfied",
            Self::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Threshold and iteration budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementConfig {
    threshold: f64,
    max_iterations: u32,
}

impl RefinementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Budgets above [`MAX_ITERATIONS`] are capped
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.clamp(1, MAX_ITERATIONS);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn is_satisfied(&self, confidence: f64) -> bool {
        meets_threshold(confidence, self.threshold)
    }
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// One transition of the state machine with the record as it stood afterwards
#[derive(Debug, Clone)]
pub struct RefinementStep {
    pub iteration: u32,
    pub state: RefinementState,
    pub question: String,
    pub confidence: f64,
    pub snapshot: Arc<ExtractedData>,
}

/// Final record, score and transition trace
#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    pub data: ExtractedData,
    pub confidence: f64,
    pub iterations: u32,
    pub state: RefinementState,
    pub trace: Vec<RefinementStep>,
}

impl RefinementOutcome {
    pub fn is_satisfied(&self) -> bool {
        self.state == RefinementState::Satisfied
    }

    /// Exhaustion as an error, for callers that treat it as one
    pub fn ensure_satisfied(&self) -> Result<(), DomainError> {
        if self.is_satisfied() {
            Ok(())
        } else {
            Err(DomainError::iteration_exhausted(
                self.iterations,
                self.confidence,
            ))
        }
    }
}
