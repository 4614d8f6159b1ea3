use anyhow::Result;
use clap::{Parser, Subcommand};
use skillkit_core::config::{self, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod marketplace;
mod skills;

#[derive(Parser)]
#[command(name = "skillkit")]
#[command(about = "skillkit - maintenance tasks for a plugin and skill repository", long_about = None)]
struct Cli {
    /// Repository root (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/skillkit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy package.json versions into the marketplace manifest
    Sync,
    /// Run the skill validator against every skill directory
    Validate,
    /// Score a SKILL.md against authoring best practices
    Quality { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::load_or_default(&cli.root)?,
    };

    match cli.command {
        Commands::Sync => marketplace::run_sync(&cli.root, &config)?,
        Commands::Validate => skills::run_validate(&cli.root, &config).await?,
        Commands::Quality { path } => skills::run_quality(&path, &config)?,
    }

    Ok(())
}
