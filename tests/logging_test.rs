// ABOUTME: Tests for logging configuration parsing and filter construction
// ABOUTME: Validates LOG_FORMAT handling, environment defaults, and subscriber installation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use withings_exporter::logging::{LogFormat, LoggingConfig};

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
    assert_eq!(LogFormat::from_str_or_default("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::from_str_or_default("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::from_str_or_default("pretty"), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str_or_default("fancy"), LogFormat::Pretty); // Default fallback
}

#[test]
fn test_default_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(!config.include_location);
    assert_eq!(config.service_name, "withings-exporter");
    assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
}

#[test]
#[serial]
fn test_config_from_env() {
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");
    env::set_var("SERVICE_NAME", "scale-exporter");

    let config = LoggingConfig::from_env();

    for var in ["RUST_LOG", "LOG_FORMAT", "LOG_INCLUDE_LOCATION", "SERVICE_NAME"] {
        env::remove_var(var);
    }

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(!config.include_thread);
    assert_eq!(config.service_name, "scale-exporter");
}

#[test]
fn test_env_filter_quiets_http_dependencies() {
    let filter = LoggingConfig::default().env_filter().to_string();
    assert!(filter.contains("info"));
    assert!(filter.contains("hyper=warn"));
    assert!(filter.contains("reqwest=warn"));
}

#[test]
#[serial]
fn test_second_init_is_an_error() {
    let config = LoggingConfig {
        format: LogFormat::Compact,
        ..LoggingConfig::default()
    };
    config.init().unwrap();
    assert!(config.init().is_err());
}
