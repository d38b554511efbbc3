//! `gotargets releases` command

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::ReleasesArgs;
use gotargets::{PlatformSet, Registry};

#[derive(Serialize)]
struct ReleaseView<'a> {
    release: &'a str,
    constraint: &'a str,
    platforms: &'a PlatformSet,
}

pub fn execute(args: ReleasesArgs) -> Result<()> {
    let registry = Registry::builtin();

    if args.json {
        let views: Vec<ReleaseView<'_>> = registry
            .releases()
            .iter()
            .map(|r| ReleaseView {
                release: r.name,
                constraint: r.constraint_text,
                platforms: &r.platforms,
            })
            .collect();

        let json = serde_json::to_string_pretty(&views).context("failed to serialize releases")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{:<8} {:<16} {:>9}", "RELEASE", "CONSTRAINT", "PLATFORMS");
    for release in registry.releases() {
        println!(
            "{:<8} {:<16} {:>9}",
            release.name,
            release.constraint_text,
            release.platforms.len()
        );
    }

    Ok(())
}
