//! Command implementations

mod ask;
mod build;
mod query;
mod status;

pub(crate) use ask::{ask_one, display_result};

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Build(args) => build::execute(args, &output).await,
        Commands::Query(args) => query::execute(args, &output, cli.explain).await,
        Commands::Ask(args) => ask::execute(args, &output, cli.explain).await,
        Commands::Status(args) => status::execute(args, &output).await,
    }
}
