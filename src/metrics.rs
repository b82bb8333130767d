// ABOUTME: Metric sink abstraction and its Prometheus gauge registry implementation
// ABOUTME: The poll loop writes gauges through MetricSink, the scrape handler encodes the registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Metric Sink
//!
//! The poller only needs to overwrite the latest value of a named gauge. Gauges are
//! atomics, so the scrape handler can encode the registry while a poll cycle is writing.

use crate::errors::MetricsError;
use crate::providers::MeasurementKind;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use tracing::warn;

/// Content type of the text exposition produced by [`PrometheusSink::encode`]
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Capability to store the latest value of a named gauge
pub trait MetricSink: Send + Sync {
    /// Overwrite the gauge called `name` with `value`
    fn set(&self, name: &str, value: f64);
}

/// Gauge registry exposing one gauge per tracked measurement kind
#[derive(Debug)]
pub struct PrometheusSink {
    registry: Registry,
    gauges: HashMap<&'static str, Gauge<f64, AtomicU64>>,
}

impl PrometheusSink {
    /// Register a gauge for each of `kinds`
    #[must_use]
    pub fn new(kinds: &[MeasurementKind]) -> Self {
        let mut registry = Registry::default();
        let mut gauges = HashMap::with_capacity(kinds.len());

        for kind in kinds {
            let name = kind.metric_name();
            if gauges.contains_key(name) {
                continue;
            }
            let gauge = Gauge::<f64, AtomicU64>::default();
            registry.register(name, kind.help(), gauge.clone());
            gauges.insert(name, gauge);
        }

        Self { registry, gauges }
    }

    /// Current value of a gauge, if it is registered
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).map(Gauge::get)
    }

    /// Render the registry in text exposition format
    ///
    /// # Errors
    ///
    /// Returns an error if encoding into the buffer fails
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl MetricSink for PrometheusSink {
    fn set(&self, name: &str, value: f64) {
        match self.gauges.get(name) {
            Some(gauge) => {
                gauge.set(value);
            }
            None => warn!(metric = name, "Ignoring value for unregistered gauge"),
        }
    }
}
