//! Ask command - one question, explicit files, result on stdout

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::infrastructure::documents::FileListDocumentSource;
use crate::infrastructure::pipeline::QuestionRunner;
use crate::infrastructure::storage::InMemoryResultStore;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Document files, best candidate first
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let source = Arc::new(FileListDocumentSource::new(args.files));
    let orchestrator = crate::create_orchestrator(&config, source).await?;
    let runner = QuestionRunner::new(Arc::new(orchestrator), Arc::new(InMemoryResultStore::new()));

    let result = runner.ask("adhoc", &args.question).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
