//! CLI module for Clinical Trial QA
//!
//! Provides subcommands:
//! - `run`: answer every question in the questions file against the articles directory
//! - `ask`: answer one question against the given files and print the result
//! - `segment`: print the section map of one document

pub mod ask;
pub mod run;
pub mod segment;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Clinical Trial QA - confidence-driven question answering over trial reports
#[derive(Parser)]
#[command(name = "trialqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer every question in the questions file and write one result per question
    Run(run::RunArgs),

    /// Answer one question against the given document files
    Ask(ask::AskArgs),

    /// Print the sections found in a document
    Segment(segment::SegmentArgs),
}

/// Load `.env`, layered configuration and logging; configuration errors are fatal
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
