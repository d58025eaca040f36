//! Infrastructure layer - Adapters for the domain ports and the pipeline services

pub mod classification;
pub mod documents;
pub mod extraction;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod sampling;
pub mod storage;
