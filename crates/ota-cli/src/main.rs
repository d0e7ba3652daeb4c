//! ota - over-the-air app distribution CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ota_cli::{Cli, Commands, cmd};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_directive = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        cmd::completions::completions(shell);
        return Ok(());
    }

    let config = cli.load_config()?;

    match cli.command {
        Commands::Serve { .. } => cmd::serve::serve(&config).await,
        Commands::List { json } => cmd::list::list(&config, json),
        Commands::Manifest(args) => cmd::manifest::manifest(&config, &args),
        Commands::Link { base_url } => cmd::link::link(&config, &base_url, cli.verbose),
        Commands::Completions { .. } => Ok(()),
    }
}
