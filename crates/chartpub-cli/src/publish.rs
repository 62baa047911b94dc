//! # Publish Subcommand
//!
//! Publishes one packaged chart from disk into a configured repository.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::config::Config;

/// Arguments for the publish subcommand.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Repository to publish into.
    #[arg(long)]
    pub repo: String,

    /// Path to the packaged chart (`.tgz`).
    pub chart: PathBuf,

    /// Stored filename. Defaults to the chart file's name.
    #[arg(long)]
    pub filename: Option<String>,
}

impl PublishArgs {
    /// Filename the chart is stored under.
    pub fn target_filename(&self) -> anyhow::Result<String> {
        if let Some(name) = &self.filename {
            return Ok(name.clone());
        }
        file_name(&self.chart)
    }
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a filename from {}", path.display()))
}

pub async fn run_publish(args: &PublishArgs, config: &Config) -> anyhow::Result<u8> {
    if config.storage.kind() == "memory" {
        tracing::warn!("memory storage is not persistent; the published chart is discarded on exit");
    }
    let publisher = config.build_publisher()?;
    let filename = args.target_filename()?;

    let file = tokio::fs::File::open(&args.chart)
        .await
        .with_context(|| format!("opening {}", args.chart.display()))?;
    publisher
        .publish(&args.repo, &filename, file)
        .await
        .with_context(|| format!("publishing {} to {}", args.chart.display(), args.repo))?;

    println!("published {filename} to {}", args.repo);
    Ok(0)
}
