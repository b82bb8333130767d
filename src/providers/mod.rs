// ABOUTME: Measurement provider module for the Withings API
// ABOUTME: Re-exports measurement kinds, readings, and the fetch client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Withings getmeas client and response parsing
pub mod withings;

pub use withings::{
    parse_measure_response, MeasurementClient, MeasurementKind, MeasurementReading,
    MeasurementSource,
};
