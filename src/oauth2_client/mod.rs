// ABOUTME: OAuth 2.0 client implementation for connecting to the Withings API
// ABOUTME: Provides the authorization-code flow, token refresh, and credential lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # OAuth 2.0 Client Module
//!
//! The exporter acts as an OAuth 2.0 client of the Withings API on behalf of a single
//! operator. This module handles:
//! - Authorization URL construction and the interactive code paste
//! - Code and refresh-token exchanges against the token endpoint
//! - Expiry tracking and transparent refresh through [`CredentialManager`]

/// Token endpoint client and credential types
pub mod client;
/// Credential lifecycle management
pub mod credentials;

pub use client::{Credential, TokenExchange, TokenGrant, WithingsOAuthClient, WithingsOAuthConfig};
pub use credentials::{
    extract_authorization_code, AuthorizationCodeProvider, ConsoleCodeProvider, CredentialManager,
};
