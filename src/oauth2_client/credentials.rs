// ABOUTME: Credential lifecycle manager for the interactive code flow and token refresh
// ABOUTME: Owns the single staleness decision point used by the poll loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::client::{Credential, TokenExchange};
use crate::errors::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Source of the authorization code the operator obtains from the authorization page
#[async_trait]
pub trait AuthorizationCodeProvider: Send + Sync {
    /// Present `authorization_url` and return what the operator pasted back
    async fn authorization_code(&self, authorization_url: &str) -> Result<String, AuthError>;
}

/// Prompts on stdout and reads one line from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleCodeProvider;

#[async_trait]
impl AuthorizationCodeProvider for ConsoleCodeProvider {
    async fn authorization_code(&self, authorization_url: &str) -> Result<String, AuthError> {
        let prompt = format!(
            "Go to {authorization_url}\n\
             Enter the value of `code` from the returned query string \
             (or paste the whole redirect URL):\n"
        );

        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;

        Ok(line.trim().to_owned())
    }
}

/// Produces a currently valid credential, refreshing it when it has lapsed
pub struct CredentialManager {
    exchange: Arc<dyn TokenExchange>,
}

impl CredentialManager {
    /// Create a manager on top of a token endpoint transport
    #[must_use]
    pub fn new(exchange: Arc<dyn TokenExchange>) -> Self {
        Self { exchange }
    }

    /// Run the interactive authorization-code flow
    ///
    /// # Errors
    ///
    /// Returns an error if no code is supplied, the pasted redirect carries a foreign
    /// `state`, or the code exchange fails
    pub async fn acquire(
        &self,
        codes: &dyn AuthorizationCodeProvider,
    ) -> Result<Credential, AuthError> {
        let state = Uuid::new_v4().simple().to_string();
        let authorization_url = self.exchange.authorization_url(&state)?;

        info!("Waiting for operator to complete authorization");
        let input = codes.authorization_code(&authorization_url).await?;
        let code = extract_authorization_code(&input, &state)?;

        let grant = self.exchange.exchange_code(&code).await?;
        let credential = Credential::from_grant(grant, Utc::now())?;

        info!(expires_at = %credential.expires_at, "Authorization complete");
        Ok(credential)
    }

    /// Exchange a refresh token for a replacement credential
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh request fails or the response is unusable
    pub async fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthError> {
        self.refresh_at(refresh_token, Utc::now()).await
    }

    /// Return `current` while it is valid at `now`, otherwise refresh it once
    ///
    /// # Errors
    ///
    /// Returns an error if a required refresh fails
    pub async fn ensure_valid(
        &self,
        current: &Credential,
        now: DateTime<Utc>,
    ) -> Result<Credential, AuthError> {
        if !current.is_expired_at(now) {
            return Ok(current.clone());
        }

        info!(expired_at = %current.expires_at, "Refreshing credentials");
        self.refresh_at(&current.refresh_token, now).await
    }

    async fn refresh_at(
        &self,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Credential, AuthError> {
        let grant = self.exchange.refresh_token(refresh_token).await?;
        let credential = Credential::from_grant(grant, issued_at)?;

        info!(expires_at = %credential.expires_at, "Credentials refreshed");
        Ok(credential)
    }
}

/// Pull the authorization code out of what the operator pasted
///
/// Accepts a bare code, a query string, or the full redirect URL. When a `state`
/// parameter is present it must equal `expected_state`.
///
/// # Errors
///
/// Returns [`AuthError::MissingCode`] for empty input and [`AuthError::StateMismatch`]
/// for a redirect issued to a different authorization attempt
pub fn extract_authorization_code(input: &str, expected_state: &str) -> Result<String, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::MissingCode);
    }

    let query = match Url::parse(input) {
        Ok(url) => url.query().map(str::to_owned),
        Err(_) if input.contains('=') => Some(input.trim_start_matches('?').to_owned()),
        Err(_) => None,
    };

    let Some(query) = query else {
        return Ok(input.to_owned());
    };

    let mut code = None;
    let mut state = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(received) = state {
        if received != expected_state {
            return Err(AuthError::StateMismatch {
                expected: expected_state.to_owned(),
                received,
            });
        }
    }

    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}
