//! Merge policies applied after each extraction

use std::fmt::Debug;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ExtractedData, ExtractedFeature, StudyMetadata};

/// Combines the prior record with a freshly extracted one
pub trait MergePolicy: Send + Sync + Debug {
    fn merge(&self, prior: &ExtractedData, incoming: ExtractedData) -> ExtractedData;
}

/// Named merge strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Each top-level field present in the new record replaces the prior one
    #[default]
    Replace,
    /// Features are unioned by description, last write wins
    Union,
}

impl MergePolicy for MergeStrategy {
    fn merge(&self, prior: &ExtractedData, incoming: ExtractedData) -> ExtractedData {
        match self {
            Self::Replace => replace_fields(prior, incoming),
            Self::Union => union_fields(prior, incoming),
        }
    }
}

fn replace_fields(prior: &ExtractedData, incoming: ExtractedData) -> ExtractedData {
    ExtractedData {
        description: if incoming.description.trim().is_empty() {
            prior.description.clone()
        } else {
            incoming.description
        },
        metadata: if incoming.metadata.is_empty() {
            prior.metadata.clone()
        } else {
            incoming.metadata
        },
        extracted_features: if incoming.extracted_features.is_empty() {
            prior.extracted_features.clone()
        } else {
            incoming.extracted_features
        },
    }
}

fn union_fields(prior: &ExtractedData, incoming: ExtractedData) -> ExtractedData {
    let mut features: IndexMap<String, ExtractedFeature> = IndexMap::new();
    for feature in prior
        .extracted_features
        .iter()
        .cloned()
        .chain(incoming.extracted_features)
    {
        features.insert(feature.description.trim().to_lowercase(), feature);
    }

    let metadata = StudyMetadata {
        authors: if incoming.metadata.authors.is_empty() {
            prior.metadata.authors.clone()
        } else {
            incoming.metadata.authors
        },
        publication_date: incoming
            .metadata
            .publication_date
            .or_else(|| prior.metadata.publication_date.clone()),
        journal: incoming
            .metadata
            .journal
            .or_else(|| prior.metadata.journal.clone()),
    };

    ExtractedData {
        description: if incoming.description.trim().is_empty() {
            prior.description.clone()
        } else {
            incoming.description
        },
        metadata,
        extracted_features: features.into_values().collect(),
    }
}
