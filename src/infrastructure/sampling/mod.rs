//! Multi-sample generation with agreement scoring
//!
//! Every prompt is sent to the generation port for `samples` completions.
//! A shared semaphore caps the number of in-flight generation calls, and
//! results come back in prompt order whatever order the calls finish in.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{DomainError, GenerationParams, SampleSet, TextGenerator};

pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Samples candidate completions per prompt under a concurrency limit
#[derive(Debug, Clone)]
pub struct ConsistencySampler {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    limiter: Arc<Semaphore>,
}

impl ConsistencySampler {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self {
            generator,
            params,
            limiter: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENCY)),
        }
    }

    /// Limit on concurrent generation calls; zero is treated as one
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(max_concurrency.max(1)));
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Sample one prompt
    pub async fn sample(&self, prompt: &str) -> Result<SampleSet, DomainError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| DomainError::internal(format!("Sampling limiter closed: {}", e)))?;

        let candidates = self.generator.generate(prompt, &self.params).await?;

        if candidates.len() < self.params.samples as usize {
            warn!(
                generator = self.generator.generator_name(),
                requested = self.params.samples,
                received = candidates.len(),
                "Generator returned fewer candidates than requested"
            );
        }

        let set = SampleSet::from_candidates(candidates);
        debug!(
            candidates = set.candidates.len(),
            consistency = set.consistency,
            "Sampled prompt"
        );

        Ok(set)
    }

    /// Sample every prompt; entry `i` of the result belongs to `prompts[i]`
    pub async fn sample_all(&self, prompts: &[String]) -> Vec<Result<SampleSet, DomainError>> {
        join_all(prompts.iter().map(|prompt| self.sample(prompt))).await
    }
}
