// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use token_issuer::configuration::IssuerConfig;
use token_issuer::models::{Credential, TokenCreateRequest};
use token_issuer::vault::CredentialBackend;
use tokio::sync::Notify;

pub const ENDPOINT: &str = "https://vault.example.com:8200";

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct StubError(pub String);

/// In-process backend that records every call it receives.
#[derive(Clone, Default)]
pub struct StubBackend {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<TokenCreateRequest>>>,
    failure: Option<String>,
    delay: Option<Duration>,
    started: Arc<Notify>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TokenCreateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Resolves once a call has entered the backend.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }
}

impl CredentialBackend for StubBackend {
    type Error = StubError;

    async fn create_token(&self, request: &TokenCreateRequest) -> Result<Credential, StubError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(*request);
        self.started.notify_one();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(StubError(message.clone())),
            None => Ok(Credential::new(format!("s.token-{n}"), format!("accessor-{n}"))),
        }
    }
}

pub fn test_config() -> IssuerConfig {
    IssuerConfig {
        listen: "127.0.0.1:0".to_string(),
        endpoint: ENDPOINT.to_string(),
    }
}
