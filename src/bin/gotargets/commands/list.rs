//! `gotargets list` command
//!
//! Prints one `os/arch` per line, marking default targets.

use anyhow::{Context, Result};

use crate::cli::ListArgs;
use gotargets::util::Config;
use gotargets::{resolve_platforms, Platform, Registry};

pub fn execute(args: ListArgs, config: &Config) -> Result<()> {
    let version = args
        .go_version
        .or_else(|| config.toolchain.go_version.clone());

    let platforms = match &version {
        Some(version) => resolve_platforms(version),
        None => Registry::builtin().latest(),
    };

    let default_only = args.default_only || config.list.default_only.unwrap_or(false);
    let selected: Vec<&Platform> = platforms
        .filter(args.os.as_deref(), args.arch.as_deref())
        .filter(|p| !default_only || p.default)
        .collect();

    if selected.is_empty() {
        tracing::warn!("No platforms match the given filters");
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&selected).context("failed to serialize platforms")?;
        println!("{}", json);
        return Ok(());
    }

    for platform in selected {
        if platform.default {
            println!("{} (default)", platform);
        } else {
            println!("{}", platform);
        }
    }

    Ok(())
}
