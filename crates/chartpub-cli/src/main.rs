//! # chartpub CLI entry point
//!
//! Parses command-line arguments, installs tracing and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chartpub_cli::config::Config;
use chartpub_cli::index::{run_index, IndexArgs};
use chartpub_cli::publish::{run_publish, PublishArgs};
use chartpub_cli::serve::{run_serve, ServeArgs};

/// chartpub: chart repository publisher.
///
/// Stores packaged charts in an object store and keeps each repository's
/// index.yaml up to date.
#[derive(Parser, Debug)]
#[command(name = "chartpub", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to configuration file.
    #[arg(long, global = true, default_value = "chartpub.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve chart repositories over HTTP.
    Serve(ServeArgs),

    /// Publish a packaged chart into a repository.
    Publish(PublishArgs),

    /// Print a repository's current index.
    Index(IndexArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(config = %cli.config.display(), "loaded configuration");

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args, &config).await,
        Commands::Publish(args) => run_publish(args, &config).await,
        Commands::Index(args) => run_index(args, &config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_publish() {
        let cli = Cli::try_parse_from([
            "chartpub",
            "publish",
            "--repo",
            "stable",
            "dist/foo-1.0.0.tgz",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("chartpub.yaml"));
        match cli.command {
            Commands::Publish(args) => {
                assert_eq!(args.repo, "stable");
                assert_eq!(args.chart, PathBuf::from("dist/foo-1.0.0.tgz"));
                assert!(args.filename.is_none());
            }
            other => panic!("expected publish, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chartpub",
            "index",
            "--repo",
            "stable",
            "-vv",
            "--log-json",
            "--config",
            "/etc/chartpub.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert_eq!(cli.config, PathBuf::from("/etc/chartpub.yaml"));
        assert!(matches!(cli.command, Commands::Index(_)));
    }

    #[test]
    fn cli_parse_serve_listen_override() {
        let cli = Cli::try_parse_from(["chartpub", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.listen.unwrap().port(), 9000),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn cli_publish_requires_repo() {
        assert!(Cli::try_parse_from(["chartpub", "publish", "foo.tgz"]).is_err());
    }
}
