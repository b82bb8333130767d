// ABOUTME: OAuth2 client for the Withings token endpoint and authorization page
// ABOUTME: Builds authorization URLs, exchanges codes, refreshes tokens, validates token payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{oauth, withings};
use crate::errors::AuthError;
use crate::utils::http_client::oauth_client;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;
use tracing::debug;
use url::Url;

/// OAuth 2.0 client configuration for a Withings partner application
#[derive(Clone)]
pub struct WithingsOAuthConfig {
    /// OAuth client ID from the Withings partner dashboard
    pub client_id: String,
    /// OAuth client secret from the Withings partner dashboard
    pub client_secret: String,
    /// Authorization page the operator is sent to
    pub auth_url: String,
    /// API base URL hosting the token endpoint
    pub api_base_url: String,
    /// Redirect URI registered for the application
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl WithingsOAuthConfig {
    /// Configuration against the production Withings endpoints
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: withings::AUTHORIZE_URL.to_owned(),
            api_base_url: withings::API_BASE_URL.to_owned(),
            redirect_uri: withings::REDIRECT_URI.to_owned(),
            scopes: withings::SCOPES.iter().map(|&s| s.to_owned()).collect(),
        }
    }

    /// Point the token endpoint at a different API host
    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Full token endpoint URL
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            withings::TOKEN_PATH
        )
    }
}

impl fmt::Debug for WithingsOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithingsOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_url", &self.auth_url)
            .field("api_base_url", &self.api_base_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Validated token payload returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Bearer token for measurement calls
    pub access_token: String,
    /// Token used to obtain the next grant
    pub refresh_token: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    /// Granted scopes, comma separated
    pub scope: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: Option<String>,
}

impl TokenGrant {
    /// Parse and validate a raw token endpoint response body
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ExchangeFailed`] if the body is not JSON, carries a non-zero
    /// `status`, or lacks a non-empty access token, refresh token, or lifetime
    pub fn from_response_body(body: &str) -> Result<Self, AuthError> {
        let response: TokenResponse = serde_json::from_str(body)
            .map_err(|e| AuthError::exchange(format!("unparseable token response: {e}")))?;

        if response.status != withings::STATUS_OK {
            return Err(AuthError::ExchangeFailed(format!(
                "token endpoint returned status {}: {}",
                response.status,
                response.error.as_deref().unwrap_or("no error message")
            )));
        }

        let body = response
            .body
            .ok_or_else(|| AuthError::exchange("token response has no body"))?;

        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::exchange("token response is missing access_token"))?;
        let refresh_token = body
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::exchange("token response is missing refresh_token"))?;
        let expires_in = body
            .expires_in
            .ok_or_else(|| AuthError::exchange("token response is missing expires_in"))?;
        if expires_in < 0 {
            return Err(AuthError::ExchangeFailed(format!(
                "token response has negative expires_in {expires_in}"
            )));
        }

        Ok(Self {
            access_token,
            refresh_token,
            expires_in,
            scope: body.scope,
            token_type: body.token_type,
        })
    }
}

/// Access/refresh token pair with its validity window
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token for measurement calls
    pub access_token: String,
    /// Token used to obtain the next credential
    pub refresh_token: String,
    /// When the grant was received
    pub issued_at: DateTime<Utc>,
    /// `issued_at + expires_in`
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential from a grant received at `issued_at`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ExchangeFailed`] if the lifetime overflows the timestamp range
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> Result<Self, AuthError> {
        let expires_at = TimeDelta::try_seconds(grant.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::ExchangeFailed(format!(
                    "token lifetime of {} seconds is out of range",
                    grant.expires_in
                ))
            })?;

        Ok(Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            issued_at,
            expires_at,
        })
    }

    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint operations the credential manager depends on
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Authorization page URL carrying the given `state`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization URL is malformed
    fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchange an authorization code for a grant
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError>;

    /// Exchange a refresh token for a new grant
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, AuthError>;
}

/// OAuth 2.0 client for the Withings token endpoint
pub struct WithingsOAuthClient {
    config: WithingsOAuthConfig,
    client: reqwest::Client,
}

impl WithingsOAuthClient {
    /// Create a new client with the given configuration
    #[must_use]
    pub fn new(config: WithingsOAuthConfig) -> Self {
        Self {
            config,
            client: oauth_client(),
        }
    }

    /// Get the OAuth configuration
    #[must_use]
    pub const fn config(&self) -> &WithingsOAuthConfig {
        &self.config
    }

    async fn request_token(
        &self,
        grant_type: &str,
        grant_param: (&str, &str),
    ) -> Result<TokenGrant, AuthError> {
        let params = [
            ("action", oauth::ACTION_REQUEST_TOKEN),
            ("grant_type", grant_type),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            grant_param,
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        debug!(grant_type, url = %self.config.token_url(), "Requesting token");

        let body = self
            .client
            .post(self.config.token_url())
            .query(&params)
            .send()
            .await
            .map_err(AuthError::exchange)?
            .error_for_status()
            .map_err(AuthError::exchange)?
            .text()
            .await
            .map_err(AuthError::exchange)?;

        TokenGrant::from_response_body(&body)
    }
}

#[async_trait]
impl TokenExchange for WithingsOAuthClient {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.config.auth_url)?;

        url.query_pairs_mut()
            .append_pair("response_type", oauth::RESPONSE_TYPE_CODE)
            .append_pair("client_id", &self.config.client_id)
            .append_pair(
                "scope",
                &self.config.scopes.join(withings::SCOPE_SEPARATOR),
            )
            .append_pair("state", state)
            .append_pair("redirect_uri", &self.config.redirect_uri);

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        self.request_token(oauth::GRANT_AUTHORIZATION_CODE, ("code", code))
            .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        self.request_token(oauth::GRANT_REFRESH_TOKEN, ("refresh_token", refresh_token))
            .await
    }
}

/// Withings token endpoint response envelope
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    body: Option<TokenBody>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}
