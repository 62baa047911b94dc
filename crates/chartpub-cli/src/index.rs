//! # Index Subcommand
//!
//! Prints a repository's current index as YAML.

use anyhow::Context;
use clap::Args;

use crate::config::Config;

/// Arguments for the index subcommand.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Repository whose index to print.
    #[arg(long)]
    pub repo: String,
}

pub async fn run_index(args: &IndexArgs, config: &Config) -> anyhow::Result<u8> {
    let publisher = config.build_publisher()?;
    let index = publisher
        .get_index(&args.repo)
        .await
        .with_context(|| format!("reading index of {}", args.repo))?;
    let yaml = index.to_yaml().context("encoding index")?;
    print!("{}", String::from_utf8_lossy(&yaml));
    Ok(0)
}
