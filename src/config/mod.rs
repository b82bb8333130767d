// ABOUTME: Configuration management module for exporter settings
// ABOUTME: Handles command-line flags with environment variable fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Command-line and environment configuration
pub mod environment;

pub use environment::ExporterConfig;
