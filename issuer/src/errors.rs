// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::constants::{EXIT_FAILURE, EXIT_MISCONFIGURED};

/// Errors raised at the request boundary.
///
/// Every variant is rendered as a plain-text body carrying the error text.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    IssueFailed(String),
    #[error("asset not found: {0}")]
    AssetNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            // Any backend refusal or outage looks the same to the caller.
            Self::IssueFailed(_) => StatusCode::FORBIDDEN,
            Self::AssetNotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {}!", crate::constants::ENV_VAULT_ENDPOINT)]
    MissingEndpoint,
    #[error("Too many arguments! ({0} positional)")]
    TooManyArguments(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum VaultError {
    #[error("invalid Vault address {0:?}")]
    InvalidAddress(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
    #[error(
        "Error making API request.\n\nURL: {method} {url}\nCode: {status}. Errors:\n\n{}",
        render_errors(.errors)
    )]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        errors: Vec<String>,
    },
    #[error("Vault response did not contain auth information")]
    MissingAuth,
}

fn render_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("* {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ServeError {
    #[error("connections still open after {0:?}, closed forcibly")]
    DrainTimeout(Duration),
}

/// Failures that stop the process before it starts serving.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to setup API client: {0}")]
    Backend(#[source] VaultError),
    #[error("Error starting server on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

impl StartupError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Backend(_) => EXIT_MISCONFIGURED,
            Self::Bind { .. } => EXIT_FAILURE,
        }
    }
}
