// ABOUTME: Scheduled poll loop that keeps credentials valid and publishes measurement gauges
// ABOUTME: Runs one cycle eagerly, then serially on a cancellable interval timer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Poller
//!
//! A poll cycle:
//! 1. asks the [`CredentialManager`] for a credential valid at the current time,
//!    skipping the whole cycle when that fails
//! 2. fetches every tracked [`MeasurementKind`] independently
//! 3. rounds each value to one decimal place and writes it through the [`MetricSink`]
//!
//! A kind that fails to fetch keeps its previously published value.

use crate::constants::withings;
use crate::errors::AuthError;
use crate::metrics::MetricSink;
use crate::oauth2_client::{Credential, CredentialManager};
use crate::providers::{MeasurementKind, MeasurementSource};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Round to the one decimal place the exporter publishes
///
/// Rounds the exact binary value, with exact ties going to the even digit, so 71.25
/// publishes as 71.2 and 1.45 (stored just below the tie) as 1.4.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Outcome of a completed poll cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Kinds published this cycle, with the rounded value written
    pub published: Vec<(MeasurementKind, f64)>,
    /// Kinds whose fetch failed; their gauges were left untouched
    pub failed: Vec<MeasurementKind>,
}

/// Drives the fetch-and-publish cycle and owns the credential
pub struct Poller {
    credentials: CredentialManager,
    credential: Credential,
    source: Arc<dyn MeasurementSource>,
    sink: Arc<dyn MetricSink>,
    kinds: Vec<MeasurementKind>,
}

impl Poller {
    /// Create a poller holding the credential obtained at startup
    #[must_use]
    pub fn new(
        credentials: CredentialManager,
        credential: Credential,
        source: Arc<dyn MeasurementSource>,
        sink: Arc<dyn MetricSink>,
        kinds: Vec<MeasurementKind>,
    ) -> Self {
        Self {
            credentials,
            credential,
            source,
            sink,
            kinds,
        }
    }

    /// Credential the next cycle starts from
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Run one cycle at the current time
    ///
    /// # Errors
    ///
    /// Returns an error if the credential had lapsed and could not be refreshed; no
    /// gauge is touched in that case
    pub async fn run_cycle(&mut self) -> Result<CycleReport, AuthError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as of `now`
    ///
    /// # Errors
    ///
    /// Returns an error if the credential had lapsed at `now` and could not be refreshed
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport, AuthError> {
        self.credential = self.credentials.ensure_valid(&self.credential, now).await?;

        info!("Updating data...");
        let mut report = CycleReport::default();
        for &kind in &self.kinds {
            match self.source.fetch(&self.credential.access_token, kind).await {
                Ok(value) => {
                    let value = round_to_tenth(value);
                    info!(
                        metric = kind.metric_name(),
                        "Setting {} metric to {:.1} {}",
                        kind.metric_name(),
                        value,
                        withings::MEASURE_UNIT_LABEL
                    );
                    self.sink.set(kind.metric_name(), value);
                    report.published.push((kind, value));
                }
                Err(e) => {
                    warn!(
                        metric = kind.metric_name(),
                        stage = "fetch",
                        error = %e,
                        "Failed to fetch {kind} measurement, keeping previous value"
                    );
                    report.failed.push(kind);
                }
            }
        }

        Ok(report)
    }

    async fn tick(&mut self) {
        if let Err(e) = self.run_cycle().await {
            warn!(
                stage = "credentials",
                error = %e,
                "Skipping poll cycle, previous values remain exposed"
            );
        }
    }

    /// Move the poller onto a background task that runs a cycle every `period`
    ///
    /// The first timed cycle starts one `period` from now; run the eager startup cycle
    /// with [`Poller::run_cycle`] before calling this. A cycle that overruns `period`
    /// delays the next one rather than overlapping it.
    #[must_use]
    pub fn spawn(mut self, period: Duration) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.tick().await;
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Poller received shutdown signal");
                        break;
                    }
                }
            }
        });

        PollerHandle { shutdown_tx, task }
    }
}

/// Handle to a spawned poll loop
pub struct PollerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the timer after any in-flight cycle completes and wait for the task
    pub async fn shutdown(self) {
        // A closed channel means the task already exited
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "Poller task ended abnormally");
        }
    }
}
