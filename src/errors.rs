// ABOUTME: Error types for credential exchange, measurement fetches, configuration, and metrics
// ABOUTME: Typed thiserror enums so callers can tell which stage of a poll cycle failed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Each stage of the exporter has its own error type:
//! - [`AuthError`] for the authorization-code flow and token refresh
//! - [`FetchError`] for a single measurement fetch
//! - [`ConfigError`] for invalid operator configuration
//! - [`MetricsError`] for exposition encoding

use thiserror::Error;

/// Failures while obtaining or refreshing OAuth credentials
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached or returned an unusable payload
    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    /// The operator did not supply an authorization code
    #[error("no authorization code was provided")]
    MissingCode,

    /// The pasted redirect URL carried a different `state` than the one issued
    #[error("authorization state mismatch: expected {expected}, got {received}")]
    StateMismatch {
        /// State generated for this authorization attempt
        expected: String,
        /// State found in the pasted redirect URL
        received: String,
    },

    /// The authorization URL could not be constructed
    #[error("invalid authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading the pasted code from the console failed
    #[error("failed to read authorization code: {0}")]
    Input(#[from] std::io::Error),
}

impl AuthError {
    /// Build an exchange failure from any displayable cause
    #[must_use]
    pub fn exchange(cause: impl std::fmt::Display) -> Self {
        Self::ExchangeFailed(cause.to_string())
    }
}

/// Failures while fetching a single measurement kind
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or non-success HTTP status
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The API answered with a non-zero `status` code
    #[error("API rejected request with status {status}")]
    Rejected {
        /// Withings status code
        status: i64,
    },

    /// The response contained no measurement groups or no measures
    #[error("no measurements available")]
    Empty,
}

/// Invalid operator configuration detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Client ID or secret missing
    #[error(
        "Cannot talk to the Withings API. Pass `--api-client-id` and `--api-client-secret` \
         or set `WITHINGS_API_CLIENT_ID` and `WITHINGS_API_CLIENT_SECRET`"
    )]
    MissingCredentials,

    /// Poll interval of zero seconds
    #[error("scrape interval must be at least one second")]
    InvalidInterval,

    /// No measurement kinds selected
    #[error("at least one measurement kind must be tracked")]
    NoMeasurements,

    /// API base URL could not be parsed
    #[error("invalid API base URL {url}: {source}")]
    InvalidBaseUrl {
        /// Value supplied by the operator
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
}

/// Failures in the metrics registry
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Text exposition encoding failed
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] std::fmt::Error),
}
