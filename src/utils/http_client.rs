// ABOUTME: HTTP client construction with timeout presets for token and measurement calls
// ABOUTME: Token exchanges get short timeouts, measurement calls get longer ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Request and connect timeouts for token endpoint calls
const OAUTH_TIMEOUTS_SECS: (u64, u64) = (15, 5);

/// Request and connect timeouts for measurement endpoint calls
const API_TIMEOUTS_SECS: (u64, u64) = (60, 10);

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder rejects the configuration.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("withings-exporter/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for OAuth token exchanges, which should be fast operations
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(OAUTH_TIMEOUTS_SECS.0, OAUTH_TIMEOUTS_SECS.1)
}

/// Client for measurement API calls
#[must_use]
pub fn api_client() -> Client {
    create_client_with_timeout(API_TIMEOUTS_SECS.0, API_TIMEOUTS_SECS.1)
}
