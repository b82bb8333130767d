// ABOUTME: Exporter binary: authorizes once interactively, then polls and serves gauges
// ABOUTME: Wires configuration, logging, credential manager, poller, and scrape server together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Withings Exporter Binary
//!
//! Startup sequence:
//! 1. parse and validate flags/environment
//! 2. run the interactive OAuth authorization (fatal on failure)
//! 3. run one poll cycle so the first scrape already has data
//! 4. start the poll timer and serve `/metrics` until Ctrl-C

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use withings_exporter::{
    config::ExporterConfig,
    logging,
    metrics::PrometheusSink,
    oauth2_client::{ConsoleCodeProvider, CredentialManager, WithingsOAuthClient},
    poller::Poller,
    providers::MeasurementClient,
    server,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ExporterConfig::parse();

    logging::init_from_env()?;

    config.validate()?;
    info!("{}", config.summary());

    let exchange = Arc::new(WithingsOAuthClient::new(config.oauth_config()));
    let credentials = CredentialManager::new(exchange);
    let credential = credentials
        .acquire(&ConsoleCodeProvider)
        .await
        .context("Initial Withings authorization failed")?;

    let kinds = config.tracked_measurements();
    let sink = Arc::new(PrometheusSink::new(&kinds));
    let source = Arc::new(MeasurementClient::new(config.api_base_url.clone()));
    let mut poller = Poller::new(credentials, credential, source, sink.clone(), kinds);

    info!("Getting initial values...");
    if let Err(e) = poller.run_cycle().await {
        warn!(stage = "credentials", error = %e, "Initial poll cycle skipped");
    }

    let handle = poller.spawn(config.poll_interval());

    let served = server::serve(config.metrics_port, sink, shutdown_signal()).await;

    info!("Stopping poller");
    handle.shutdown().await;

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
