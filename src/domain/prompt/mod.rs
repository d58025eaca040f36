//! Prompt construction: few-shot section prompts and extraction templates

mod builder;
mod exemplars;
mod template;

pub use builder::PromptBuilder;
pub use exemplars::ExemplarTable;
pub use template::{PromptTemplate, PromptVariable};
