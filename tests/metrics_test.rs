// ABOUTME: Tests for the gauge registry and the /metrics scrape endpoint
// ABOUTME: Uses tower oneshot against the axum router without binding a port
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use withings_exporter::metrics::{MetricSink, PrometheusSink, OPENMETRICS_CONTENT_TYPE};
use withings_exporter::providers::MeasurementKind;
use withings_exporter::server::metrics_router;

#[test]
fn test_registers_one_gauge_per_kind() {
    let sink = PrometheusSink::new(&MeasurementKind::ALL);
    let text = sink.encode().unwrap();

    assert!(text.contains("# HELP withings_current_weight Shows the latest weight measurement"));
    assert!(text.contains("# TYPE withings_current_weight gauge"));
    assert!(text.contains("# HELP withings_current_hydration Shows the latest hydration measurement"));
    assert!(text.contains("# TYPE withings_current_hydration gauge"));
    assert!(text.ends_with("# EOF\n"));
}

#[test]
fn test_untracked_kind_is_not_exposed() {
    let sink = PrometheusSink::new(&[MeasurementKind::Weight]);
    let text = sink.encode().unwrap();

    assert!(text.contains("withings_current_weight"));
    assert!(!text.contains("withings_current_hydration"));
    assert_eq!(sink.get("withings_current_hydration"), None);
}

#[test]
fn test_duplicate_kinds_register_once() {
    let sink = PrometheusSink::new(&[MeasurementKind::Weight, MeasurementKind::Weight]);
    let text = sink.encode().unwrap();
    assert_eq!(text.matches("# TYPE withings_current_weight gauge").count(), 1);
}

#[test]
fn test_set_overwrites_latest_value() {
    let sink = PrometheusSink::new(&MeasurementKind::ALL);
    assert_eq!(sink.get("withings_current_weight"), Some(0.0));

    sink.set("withings_current_weight", 71.2);
    sink.set("withings_current_weight", 70.9);
    sink.set("withings_current_hydration", 40.5);

    assert_eq!(sink.get("withings_current_weight"), Some(70.9));
    let text = sink.encode().unwrap();
    assert!(text.contains("withings_current_weight 70.9"));
    assert!(text.contains("withings_current_hydration 40.5"));
}

#[test]
fn test_set_on_unregistered_name_is_ignored() {
    let sink = PrometheusSink::new(&[MeasurementKind::Weight]);
    let before = sink.encode().unwrap();

    sink.set("withings_current_bone_mass", 3.1);

    assert_eq!(sink.encode().unwrap(), before);
    assert_eq!(sink.get("withings_current_bone_mass"), None);
}

#[tokio::test]
async fn test_metrics_endpoint_serves_registry() {
    let sink = Arc::new(PrometheusSink::new(&MeasurementKind::ALL));
    sink.set("withings_current_weight", 712.3);

    let response = metrics_router(sink)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        OPENMETRICS_CONTENT_TYPE
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("withings_current_weight 712.3"));
}

#[tokio::test]
async fn test_other_paths_are_not_found() {
    let sink = Arc::new(PrometheusSink::new(&MeasurementKind::ALL));

    let response = metrics_router(sink)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
