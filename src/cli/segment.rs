//! Segment command - section map of one document as JSON

use std::path::PathBuf;

use clap::Args;
use indexmap::IndexMap;
use tracing::warn;

use crate::domain::{DocumentSegmenter, SectionVocabulary};

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Document text file
    pub file: PathBuf,
}

pub async fn run(args: SegmentArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let text = tokio::fs::read_to_string(&args.file).await?;
    let segmenter =
        DocumentSegmenter::new(SectionVocabulary::new(&config.pipeline.section_headers));
    let sections = segmenter.segment(&text);

    if sections.is_empty() {
        warn!(file = %args.file.display(), "No section headers recognized");
    }

    let map: IndexMap<&str, &str> = sections
        .iter()
        .map(|section| (section.name.as_str(), section.text.as_str()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&map)?);

    Ok(())
}
