use clap::Parser;
use trialqa::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => cli::run::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Segment(args) => cli::segment::run(args).await,
    }
}
