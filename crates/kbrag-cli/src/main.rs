//! kbrag CLI - Command-line interface
//!
//! This is the main CLI adapter for the knowledge base.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;
mod storage;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    if let Err(e) = runtime.block_on(async { commands::execute(cli).await }) {
        // Errors carrying suggestions get the richer rendering
        match e.downcast::<CliError>() {
            Ok(cli_error) => {
                cli_error.display();
                std::process::exit(1);
            }
            Err(other) => return Err(other),
        }
    }

    Ok(())
}
