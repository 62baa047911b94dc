//! # Serve Subcommand
//!
//! Runs the HTTP front end until interrupted.

use std::net::SocketAddr;

use anyhow::Context;
use chartpub_api::{router, AppState};
use clap::Args;

use crate::config::Config;

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on. Overrides `listen` from the config file.
    #[arg(long)]
    pub listen: Option<SocketAddr>,
}

pub async fn run_serve(args: &ServeArgs, config: &Config) -> anyhow::Result<u8> {
    let publisher = config.build_publisher()?;
    let state = AppState::with_limit(publisher, config.max_chart_bytes);
    let app = router(state);

    let addr = args.listen.unwrap_or(config.listen);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, storage = config.storage.kind(), "chartpub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("chartpub stopped");
    Ok(0)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
