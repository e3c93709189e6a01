// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the token issuer.
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/` | [`index`] | Landing page |
//! | GET | `/favicon.ico` | [`favicon`] | Icon |
//! | GET | `/token.json` | [`issue_token`] | Issue a constrained Vault token |
//! | GET | `/health` | [`health`] | Health check endpoint |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::application::AppState;
use crate::assets;
use crate::constants::{CONTENT_TYPE_HTML, CONTENT_TYPE_ICON, CROWDSOURCE_TOKEN_REQUEST};
use crate::errors::AppError;
use crate::models::TokenResponse;
use crate::vault::CredentialBackend;

/// Health check endpoint.
///
/// Never touches the backend; answering at all is the signal.
///
/// # Response
///
/// ```json
/// {"status":"ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn index() -> Result<Response, AppError> {
    let data = assets::asset(assets::INDEX_HTML)?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE_HTML)], data).into_response())
}

pub async fn favicon() -> Result<Response, AppError> {
    let data = assets::asset(assets::FAVICON_ICO)?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE_ICON)], data).into_response())
}

/// Issues a short-lived token from the credential backend.
///
/// Nothing from the request is read. Each call makes exactly one
/// `create_token` request with [`CROWDSOURCE_TOKEN_REQUEST`], so callers cannot
/// widen the policies, use count or lifetime of what they get.
///
/// # Response
///
/// ```json
/// {"endpoint":"https://vault.example.com","token":"hvs.CAES..."}
/// ```
///
/// # Errors
///
/// - [`AppError::IssueFailed`] - the backend refused or could not be reached;
///   rendered as 403 with the backend's error text
#[tracing::instrument(skip(state))]
pub async fn issue_token<B: CredentialBackend>(
    State(state): State<Arc<AppState<B>>>,
) -> Result<Response, AppError> {
    let credential = state
        .backend
        .create_token(&CROWDSOURCE_TOKEN_REQUEST)
        .await
        .map_err(|e| {
            tracing::warn!("[issuer] token creation failed: {}", e);
            AppError::IssueFailed(e.to_string())
        })?;

    tracing::info!("[issuer] issued token, accessor: {}", credential.accessor);

    let body = TokenResponse {
        endpoint: &state.config.endpoint,
        token: &credential.client_token,
    };

    Ok(Json(body).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    // Unit tests for route handlers (testing handler functions directly)
    // Integration tests using TestServer are in tests/http_integration.rs

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_index_is_html() {
        let response = index().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_favicon_is_icon() {
        let response = favicon().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/x-icon");
    }
}
