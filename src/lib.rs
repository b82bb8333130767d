// ABOUTME: Main library entry point for the Withings Prometheus exporter
// ABOUTME: Provides the credential lifecycle, measurement polling, and gauge exposition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Withings Exporter
//!
//! Periodically reads body weight and hydration from the Withings API and exposes the
//! latest values as Prometheus gauges.
//!
//! ## Architecture
//!
//! - **`OAuth2`**: interactive authorization-code flow and transparent token refresh
//! - **Providers**: the Withings getmeas client
//! - **Poller**: the scheduled fetch-round-publish cycle
//! - **Metrics**: gauge registry behind the `MetricSink` capability
//! - **Server**: the `/metrics` scrape endpoint
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use withings_exporter::config::ExporterConfig;
//!
//! let config = ExporterConfig::parse();
//! config.validate()?;
//! println!("{}", config.summary());
//! # Ok::<(), withings_exporter::errors::ConfigError>(())
//! ```

/// Command-line and environment configuration
pub mod config;

/// Fixed API values and configuration defaults
pub mod constants;

/// Error types for each exporter stage
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Metric sink capability and Prometheus registry
pub mod metrics;

/// `OAuth2` client and credential lifecycle
pub mod oauth2_client;

/// Scheduled poll-and-publish loop
pub mod poller;

/// Measurement providers
pub mod providers;

/// Scrape endpoint
pub mod server;

/// Shared helpers
pub mod utils;
