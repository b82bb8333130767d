// ABOUTME: Exporter configuration from command-line flags and environment variables
// ABOUTME: Validates OAuth credentials, poll interval, measurement selection, and API base URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Flag and environment configuration for the exporter binary

use crate::constants::{defaults, withings};
use crate::errors::ConfigError;
use crate::oauth2_client::WithingsOAuthConfig;
use crate::providers::MeasurementKind;
use clap::Parser;
use std::time::Duration;
use url::Url;

/// Exporter configuration
///
/// Every flag can also be supplied through the environment variable named in its help.
#[derive(Debug, Clone, Parser)]
#[command(name = "withings-exporter", version)]
#[command(about = "Expose Withings weight and hydration measurements as Prometheus gauges")]
pub struct ExporterConfig {
    /// Withings API OAuth client ID (https://account.withings.com/partner/add_oauth2)
    #[arg(long, env = "WITHINGS_API_CLIENT_ID", default_value = "", hide_env_values = true)]
    pub api_client_id: String,

    /// Withings API OAuth client secret (https://account.withings.com/partner/add_oauth2)
    #[arg(long, env = "WITHINGS_API_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    pub api_client_secret: String,

    /// The port to bind to for serving metrics
    #[arg(long, env = "METRICS_PORT", default_value_t = defaults::METRICS_PORT)]
    pub metrics_port: u16,

    /// Time in seconds between polls of the Withings API
    #[arg(long, env = "METRICS_SCRAPE_INTERVAL", default_value_t = defaults::SCRAPE_INTERVAL_SECS)]
    pub scrape_interval: u64,

    /// Withings API base URL
    #[arg(long, env = "WITHINGS_API_BASE_URL", default_value = withings::API_BASE_URL)]
    pub api_base_url: String,

    /// Measurements to export
    #[arg(
        long,
        env = "WITHINGS_MEASUREMENTS",
        value_enum,
        value_delimiter = ',',
        default_values_t = MeasurementKind::ALL
    )]
    pub measurements: Vec<MeasurementKind>,
}

impl ExporterConfig {
    /// Check the configuration before any network traffic happens
    ///
    /// # Errors
    ///
    /// Returns an error for missing OAuth credentials, a zero interval, an empty
    /// measurement selection, or an unparseable base URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_client_id.trim().is_empty() || self.api_client_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        if self.scrape_interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.measurements.is_empty() {
            return Err(ConfigError::NoMeasurements);
        }
        Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            source,
        })?;
        Ok(())
    }

    /// Interval between timed poll cycles
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.scrape_interval)
    }

    /// Tracked kinds with duplicates removed, in the order given
    #[must_use]
    pub fn tracked_measurements(&self) -> Vec<MeasurementKind> {
        let mut kinds = Vec::with_capacity(self.measurements.len());
        for &kind in &self.measurements {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// OAuth client configuration for the token endpoint
    #[must_use]
    pub fn oauth_config(&self) -> WithingsOAuthConfig {
        WithingsOAuthConfig::new(self.api_client_id.trim(), self.api_client_secret.trim())
            .with_api_base_url(self.api_base_url.clone())
    }

    /// One-line description for startup logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        let measurements = self
            .tracked_measurements()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "Withings Exporter Configuration: metrics port {}, poll interval {}s, API {}, measurements [{}]",
            self.metrics_port, self.scrape_interval, self.api_base_url, measurements
        )
    }
}
