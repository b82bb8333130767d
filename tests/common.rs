// ABOUTME: Shared test utilities and fakes for exporter integration tests
// ABOUTME: Provides an in-process fake Withings server, counting token exchange, and recording sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `withings_exporter`

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use withings_exporter::errors::{AuthError, FetchError};
use withings_exporter::metrics::MetricSink;
use withings_exporter::oauth2_client::{AuthorizationCodeProvider, TokenExchange, TokenGrant};
use withings_exporter::providers::{MeasurementKind, MeasurementSource};

/// Fixed reference instant for credential arithmetic
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

/// Bind an axum router on an ephemeral local port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Build a grant without going through the token endpoint
pub fn grant(access_token: &str, refresh_token: &str, expires_in: i64) -> TokenGrant {
    TokenGrant {
        access_token: access_token.to_owned(),
        refresh_token: refresh_token.to_owned(),
        expires_in,
        scope: Some("user.info,user.metrics".to_owned()),
        token_type: Some("Bearer".to_owned()),
    }
}

/// Successful token endpoint body
pub fn token_body(access_token: &str, refresh_token: &str, expires_in: i64) -> Value {
    json!({
        "status": 0,
        "body": {
            "userid": "363",
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": expires_in,
            "scope": "user.info,user.metrics",
            "token_type": "Bearer"
        }
    })
}

/// getmeas body with one group per raw value
pub fn measure_body(raw_values: &[f64], meastype: u32) -> Value {
    let groups: Vec<Value> = raw_values
        .iter()
        .map(|value| {
            json!({
                "grpid": 1,
                "date": 1_740_816_000,
                "created": 1_740_816_060,
                "category": 1,
                "measures": [{ "value": value, "type": meastype, "unit": -3 }]
            })
        })
        .collect();
    json!({ "status": 0, "body": { "updatetime": 1_740_816_100, "measuregrps": groups } })
}

// ============================================================================
// Fakes
// ============================================================================

/// Token exchange that hands out numbered grants and counts calls
pub struct CountingExchange {
    pub code_exchanges: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    pub expires_in: i64,
    pub fail_refresh: bool,
}

impl CountingExchange {
    pub fn new(expires_in: i64) -> Self {
        Self {
            code_exchanges: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            refresh_tokens_seen: Mutex::new(Vec::new()),
            expires_in,
            fail_refresh: false,
        }
    }

    pub fn failing_refresh() -> Self {
        Self {
            fail_refresh: true,
            ..Self::new(3600)
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for CountingExchange {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!(
            "https://account.example/authorize2?client_id=id&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        self.code_exchanges.fetch_add(1, Ordering::SeqCst);
        Ok(grant(&format!("access-{code}"), "refresh-0", self.expires_in))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        self.refresh_tokens_seen
            .lock()
            .unwrap()
            .push(refresh_token.to_owned());
        if self.fail_refresh {
            return Err(AuthError::ExchangeFailed("invalid refresh_token".to_owned()));
        }
        Ok(grant(
            &format!("access-r{n}"),
            &format!("refresh-{n}"),
            self.expires_in,
        ))
    }
}

/// Answers the prompt with a fixed string, or echoes a redirect for the issued state
pub enum FixedCodeProvider {
    /// Return this text verbatim
    Text(String),
    /// Return `http://localhost/?code=<code>&state=<state from the URL>`
    Redirect(String),
}

#[async_trait]
impl AuthorizationCodeProvider for FixedCodeProvider {
    async fn authorization_code(&self, authorization_url: &str) -> Result<String, AuthError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Redirect(code) => {
                let url = url::Url::parse(authorization_url).unwrap();
                let state = url
                    .query_pairs()
                    .find(|(k, _)| k == "state")
                    .map(|(_, v)| v.into_owned())
                    .unwrap();
                Ok(format!("http://localhost/?code={code}&state={state}"))
            }
        }
    }
}

/// Measurement source whose per-kind answers can be changed between cycles
#[derive(Default)]
pub struct ScriptedSource {
    answers: Mutex<HashMap<MeasurementKind, Option<f64>>>,
    pub tokens_seen: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    /// `Some(value)` succeeds, `None` fails with `FetchError::Empty`
    pub fn set(&self, kind: MeasurementKind, answer: Option<f64>) {
        self.answers.lock().unwrap().insert(kind, answer);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeasurementSource for ScriptedSource {
    async fn fetch(&self, access_token: &str, kind: MeasurementKind) -> Result<f64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen
            .lock()
            .unwrap()
            .push(access_token.to_owned());
        match self.answers.lock().unwrap().get(&kind).copied().flatten() {
            Some(value) => Ok(value),
            None => Err(FetchError::Empty),
        }
    }
}

/// Sink that remembers every write
#[derive(Default)]
pub struct RecordingSink {
    pub writes: Mutex<Vec<(String, f64)>>,
}

impl RecordingSink {
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl MetricSink for RecordingSink {
    fn set(&self, name: &str, value: f64) {
        self.writes.lock().unwrap().push((name.to_owned(), value));
    }
}
