// ABOUTME: Utility modules shared by the OAuth client and the measurement client
// ABOUTME: Contains HTTP client construction with per-purpose timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client configuration and helpers
pub mod http_client;
