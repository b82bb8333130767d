// ABOUTME: Fixed Withings API endpoints, OAuth parameters, and exporter defaults
// ABOUTME: Contains measurement scale, metric names, and configuration fallback values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Values that are fixed by the Withings API contract, plus the defaults used when the
//! operator does not override a setting.

/// Withings API endpoints and OAuth parameters
pub mod withings {
    /// Production API base URL
    pub const API_BASE_URL: &str = "https://wbsapi.withings.net";

    /// User-facing authorization page for the code flow
    pub const AUTHORIZE_URL: &str = "https://account.withings.com/oauth2_user/authorize2";

    /// Token endpoint path, relative to the API base URL
    pub const TOKEN_PATH: &str = "/v2/oauth2";

    /// Measurement endpoint path, relative to the API base URL
    pub const MEASURE_PATH: &str = "/measure";

    /// Redirect URI registered with the Withings partner application
    pub const REDIRECT_URI: &str = "http://localhost";

    /// Scopes requested during authorization
    pub const SCOPES: &[&str] = &["user.info", "user.metrics"];

    /// Withings joins scopes with commas rather than spaces
    pub const SCOPE_SEPARATOR: &str = ",";

    /// `status` value the API uses for a successful response
    pub const STATUS_OK: i64 = 0;

    /// Measurement category for real (non-objective) measures
    pub const MEASURE_CATEGORY_REAL: &str = "1";

    /// Raw measurement values are reported in milli-units
    pub const MEASURE_UNIT_SCALE: f64 = 1000.0;

    /// Unit of scaled weight and hydration values
    pub const MEASURE_UNIT_LABEL: &str = "kg";
}

/// OAuth grant types and token-request actions
pub mod oauth {
    /// Action parameter for the token endpoint
    pub const ACTION_REQUEST_TOKEN: &str = "requesttoken";

    /// Grant type for the initial code exchange
    pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";

    /// Grant type for token refresh
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

    /// Response type requested on the authorization page
    pub const RESPONSE_TYPE_CODE: &str = "code";
}

/// Published gauge names
pub mod metric_names {
    /// Latest body weight in kilograms
    pub const CURRENT_WEIGHT: &str = "withings_current_weight";

    /// Latest hydration in kilograms
    pub const CURRENT_HYDRATION: &str = "withings_current_hydration";
}

/// Configuration defaults
pub mod defaults {
    /// Port the scrape endpoint binds to
    pub const METRICS_PORT: u16 = 8080;

    /// Seconds between poll cycles
    pub const SCRAPE_INTERVAL_SECS: u64 = 1800;

    /// Path the scrape endpoint is served on
    pub const METRICS_PATH: &str = "/metrics";
}

/// Service identification for structured logs
pub mod service_names {
    /// Name reported in startup logs
    pub const WITHINGS_EXPORTER: &str = "withings-exporter";
}
