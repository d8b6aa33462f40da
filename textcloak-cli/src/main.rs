mod cli;
mod corpus;
mod scoring;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Corpus { output } => cli::corpus_command(output),
        Commands::Encode { corpus, output } => cli::encode_command(corpus, output),
        Commands::Verify { catalog } => cli::verify_command(catalog),
        Commands::Classify { text, file } => cli::classify_command(text, file),
        Commands::Canonicalize { text, file } => cli::canonicalize_command(text, file),
        Commands::Guard { text, file } => cli::guard_command(text, file),
        Commands::Score {
            primary,
            secondary,
            output,
        } => cli::score_command(primary, secondary, output),
    }
}
