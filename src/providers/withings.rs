// ABOUTME: Withings measurement API client for weight and hydration readings
// ABOUTME: Issues bearer-authenticated getmeas calls and parses measurement groups into readings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{metric_names, withings};
use crate::errors::FetchError;
use crate::utils::http_client::api_client;
use async_trait::async_trait;
use clap::ValueEnum;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

// ============================================================================
// Measurement kinds
// ============================================================================

/// Measurement types the exporter tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum MeasurementKind {
    /// Body weight
    Weight,
    /// Hydration (body water mass)
    Hydration,
}

impl MeasurementKind {
    /// Every supported kind, in publishing order
    pub const ALL: [Self; 2] = [Self::Weight, Self::Hydration];

    /// Withings `meastype` code
    #[must_use]
    pub const fn api_type_code(self) -> u32 {
        match self {
            Self::Weight => 1,
            Self::Hydration => 77,
        }
    }

    /// Gauge name the latest value is published under
    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::Weight => metric_names::CURRENT_WEIGHT,
            Self::Hydration => metric_names::CURRENT_HYDRATION,
        }
    }

    /// Gauge help text
    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::Weight => "Shows the latest weight measurement (assumed in kg)",
            Self::Hydration => "Shows the latest hydration measurement (assumed in kg)",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight => write!(f, "weight"),
            Self::Hydration => write!(f, "hydration"),
        }
    }
}

/// One raw measurement, before scaling to conventional units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementReading {
    /// Kind this reading belongs to
    pub kind: MeasurementKind,
    /// Value as reported by the API
    pub raw_value: f64,
    /// Divisor from the API unit to kilograms
    pub unit_scale: f64,
}

impl MeasurementReading {
    /// Value in conventional units
    #[must_use]
    pub fn value(&self) -> f64 {
        self.raw_value / self.unit_scale
    }
}

// ============================================================================
// Withings API Response Structures
// ============================================================================

/// getmeas response envelope
#[derive(Debug, Deserialize)]
struct MeasureResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    body: Option<MeasureBody>,
}

#[derive(Debug, Deserialize)]
struct MeasureBody {
    #[serde(default, rename = "measuregrps")]
    measure_groups: Vec<MeasureGroup>,
}

/// Readings taken at the same time
#[derive(Debug, Deserialize)]
struct MeasureGroup {
    /// Unix timestamp of the measurement
    #[serde(default)]
    date: Option<i64>,
    /// Unix timestamp the group was stored
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
    #[serde(default, rename = "type")]
    measure_type: Option<u32>,
}

/// Parse a getmeas body and take the first measure of the most recent group
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] for bodies that are not the getmeas shape,
/// [`FetchError::Rejected`] for non-zero API status, and [`FetchError::Empty`] when
/// there is no group or the first group carries no measure
pub fn parse_measure_response(
    body: &str,
    kind: MeasurementKind,
) -> Result<MeasurementReading, FetchError> {
    let response: MeasureResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.status != withings::STATUS_OK {
        return Err(FetchError::Rejected {
            status: response.status,
        });
    }

    let groups = response.body.map(|b| b.measure_groups).unwrap_or_default();
    let (group, measure) = groups
        .first()
        .and_then(|group| group.measures.first().map(|measure| (group, measure)))
        .ok_or(FetchError::Empty)?;

    debug!(
        kind = %kind,
        date = ?group.date,
        created = ?group.created,
        measure_type = ?measure.measure_type,
        raw_value = measure.value,
        "Parsed measurement"
    );

    Ok(MeasurementReading {
        kind,
        raw_value: measure.value,
        unit_scale: withings::MEASURE_UNIT_SCALE,
    })
}

// ============================================================================
// Measurement client
// ============================================================================

/// Source of the latest value per measurement kind
#[async_trait]
pub trait MeasurementSource: Send + Sync {
    /// Latest value for `kind`, in conventional units
    async fn fetch(&self, access_token: &str, kind: MeasurementKind) -> Result<f64, FetchError>;
}

/// Client for the Withings getmeas endpoint
pub struct MeasurementClient {
    base_url: String,
    client: Client,
}

impl MeasurementClient {
    /// Create a client against the given API base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: api_client(),
        }
    }

    /// Full measurement endpoint URL
    #[must_use]
    pub fn measure_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            withings::MEASURE_PATH
        )
    }

    /// Fetch the most recent reading for `kind`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] on network or HTTP status failures, and the
    /// parse errors of [`parse_measure_response`]
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn fetch_reading(
        &self,
        access_token: &str,
        kind: MeasurementKind,
    ) -> Result<MeasurementReading, FetchError> {
        let meastypes = kind.api_type_code().to_string();
        let params = [
            ("action", "getmeas"),
            ("meastypes", meastypes.as_str()),
            ("category", withings::MEASURE_CATEGORY_REAL),
        ];

        let body = self
            .client
            .post(self.measure_url())
            .query(&params)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_measure_response(&body, kind)
    }
}

#[async_trait]
impl MeasurementSource for MeasurementClient {
    async fn fetch(&self, access_token: &str, kind: MeasurementKind) -> Result<f64, FetchError> {
        Ok(self.fetch_reading(access_token, kind).await?.value())
    }
}
