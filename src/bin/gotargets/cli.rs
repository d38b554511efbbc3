//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gotargets - supported Go cross-compilation targets per Go release
#[derive(Parser)]
#[command(name = "gotargets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the global and project ones
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the OS/arch pairs a Go version can build for
    List(ListArgs),

    /// Show every known release and the versions it covers
    Releases(ReleasesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Go version, e.g. go1.16.5 (defaults to the latest release)
    #[arg(long, env = "GOTARGETS_GO_VERSION")]
    pub go_version: Option<String>,

    /// Only list default build targets
    #[arg(long)]
    pub default_only: bool,

    /// Only list platforms for this OS
    #[arg(long)]
    pub os: Option<String>,

    /// Only list platforms for this architecture
    #[arg(long)]
    pub arch: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ReleasesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
