//! Run command - batch over the questions file

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::infrastructure::documents::DirectoryDocumentSource;
use crate::infrastructure::pipeline::{QuestionRunner, load_questions};
use crate::infrastructure::storage::FileResultStore;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory of article text files (overrides paths.articles_dir)
    #[arg(long)]
    pub articles_dir: Option<PathBuf>,

    /// JSON object of question id to question text (overrides paths.questions_file)
    #[arg(long)]
    pub questions_file: Option<PathBuf>,

    /// Directory for result files (overrides paths.output_dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let articles_dir = args.articles_dir.unwrap_or(config.paths.articles_dir.clone());
    let questions_file = args
        .questions_file
        .unwrap_or(config.paths.questions_file.clone());
    let output_dir = args.output_dir.unwrap_or(config.paths.output_dir.clone());

    let questions = load_questions(&questions_file).await?;
    let source = Arc::new(DirectoryDocumentSource::new(&articles_dir));
    let orchestrator = crate::create_orchestrator(&config, source).await?;
    let store = Arc::new(FileResultStore::new(&output_dir));

    let runner = QuestionRunner::new(Arc::new(orchestrator), store);
    let summary = runner.run(&questions).await?;

    info!(
        articles = %articles_dir.display(),
        output = %output_dir.display(),
        processed = summary.processed,
        satisfied = summary.satisfied,
        failed = summary.failed,
        "Run complete"
    );

    Ok(())
}
