//! gotargets CLI - supported Go cross-compilation targets

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use gotargets::util::config::{self, Config};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for listings
    let filter = if cli.verbose {
        EnvFilter::new("gotargets=debug")
    } else {
        EnvFilter::new("gotargets=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            config::load_config(
                config::global_config_path().as_deref(),
                &config::project_config_path(&cwd),
            )
        }
    };

    // Execute command
    match cli.command {
        Commands::List(args) => commands::list::execute(args, &config),
        Commands::Releases(args) => commands::releases::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
