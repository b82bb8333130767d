// ABOUTME: HTTP scrape endpoint serving the gauge registry in text exposition format
// ABOUTME: Axum router and server loop with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::defaults;
use crate::metrics::{PrometheusSink, OPENMETRICS_CONTENT_TYPE};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Build the router exposing `/metrics`
#[must_use]
pub fn metrics_router(sink: Arc<PrometheusSink>) -> Router {
    Router::new()
        .route(defaults::METRICS_PATH, get(handle_metrics))
        .with_state(sink)
}

async fn handle_metrics(State(sink): State<Arc<PrometheusSink>>) -> Response {
    match sink.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the scrape endpoint on `port` until `shutdown` resolves
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn serve<F>(port: u16, sink: Arc<PrometheusSink>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics port {port}"))?;

    info!(
        "Serving metrics on http://localhost:{port}{}. Configure your Prometheus to scrape accordingly.",
        defaults::METRICS_PATH
    );

    axum::serve(listener, metrics_router(sink))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Metrics server failed")
}
