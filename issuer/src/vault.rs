// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Credential backend abstraction and its HashiCorp Vault implementation.
//!
//! The HTTP layer only ever sees [`CredentialBackend`], so tests can swap the
//! network client for an in-process stub.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::configuration::VaultOptions;
use crate::errors::VaultError;
use crate::models::{Credential, TokenCreateRequest, VaultErrors, VaultSecret};

/// A service able to mint constrained tokens.
///
/// Implementations must be safe to call from many requests at once.
pub trait CredentialBackend: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_token(
        &self,
        request: &TokenCreateRequest,
    ) -> impl Future<Output = Result<Credential, Self::Error>> + Send;
}

/// Client for Vault's `auth/token/create` endpoint.
pub struct VaultClient {
    client: Client,
    create_url: Url,
    token: Option<String>,
}

impl VaultClient {
    /// Builds a client from connection options. No request is made here.
    pub fn new(options: &VaultOptions) -> Result<Self, VaultError> {
        let invalid = || VaultError::InvalidAddress(options.address.clone());

        let mut base = Url::parse(&options.address).map_err(|_| invalid())?;
        if base.cannot_be_a_base() {
            return Err(invalid());
        }
        // join() replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let create_url = base.join("v1/auth/token/create").map_err(|_| invalid())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .danger_accept_invalid_certs(options.skip_verify)
            .build()?;

        if options.skip_verify {
            tracing::warn!("[issuer] TLS verification towards Vault is disabled");
        }

        Ok(Self {
            client,
            create_url,
            token: options.token.clone(),
        })
    }

    pub fn create_url(&self) -> &Url {
        &self.create_url
    }
}

impl CredentialBackend for VaultClient {
    type Error = VaultError;

    #[tracing::instrument(skip(self))]
    async fn create_token(&self, request: &TokenCreateRequest) -> Result<Credential, VaultError> {
        let mut builder = self
            .client
            .post(self.create_url.clone())
            .header("X-Vault-Request", "true")
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.header("X-Vault-Token", token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let errors = response
                .json::<VaultErrors>()
                .await
                .unwrap_or_default()
                .errors;
            return Err(VaultError::Api {
                method: "POST",
                url: self.create_url.to_string(),
                status: status.as_u16(),
                errors,
            });
        }

        let secret: VaultSecret = response.json().await?;
        let mut auth = secret.auth.ok_or(VaultError::MissingAuth)?;
        if auth.client_token.is_empty() {
            return Err(VaultError::MissingAuth);
        }

        Ok(Credential::new(
            std::mem::take(&mut auth.client_token),
            std::mem::take(&mut auth.accessor),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::CROWDSOURCE_TOKEN_REQUEST;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer, token: Option<&str>) -> VaultClient {
        let options = VaultOptions {
            address: format!("http://{}", server.address()),
            token: token.map(String::from),
            ..VaultOptions::default()
        };
        VaultClient::new(&options).unwrap()
    }

    #[test]
    fn test_create_url_format() {
        for address in [
            "https://vault.example.com:8200",
            "https://vault.example.com:8200/",
        ] {
            let options = VaultOptions {
                address: address.to_string(),
                ..VaultOptions::default()
            };
            let client = VaultClient::new(&options).unwrap();
            assert_eq!(
                client.create_url().as_str(),
                "https://vault.example.com:8200/v1/auth/token/create"
            );
        }
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let options = VaultOptions {
            address: "not a url".to_string(),
            ..VaultOptions::default()
        };
        assert!(matches!(
            VaultClient::new(&options),
            Err(VaultError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_create_token_sends_fixed_constraints() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/auth/token/create")
                .header("x-vault-token", "issuer-token")
                .header("x-vault-request", "true")
                .json_body(serde_json::json!({
                    "policies": ["crowdsource", "default"],
                    "num_uses": 5,
                    "ttl": "5m",
                    "explicit_max_ttl": "5m"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"auth":{"client_token":"s.issued","accessor":"acc-1","policies":["crowdsource","default"],"lease_duration":300}}"#);
        });

        let client = client_for(&server, Some("issuer-token"));
        let credential = client
            .create_token(&CROWDSOURCE_TOKEN_REQUEST)
            .await
            .unwrap();

        assert_eq!(credential.client_token, "s.issued");
        assert_eq!(credential.accessor, "acc-1");
        mock.assert();
    }

    #[tokio::test]
    async fn test_api_error_carries_vault_errors() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(POST).path("/v1/auth/token/create");
            then.status(403)
                .header("content-type", "application/json")
                .body(r#"{"errors":["permission denied"]}"#);
        });

        let client = client_for(&server, Some("issuer-token"));
        let err = client
            .create_token(&CROWDSOURCE_TOKEN_REQUEST)
            .await
            .unwrap_err();

        match err {
            VaultError::Api { status, errors, .. } => {
                assert_eq!(status, 403);
                assert_eq!(errors, vec!["permission denied".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_with_unparseable_body() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(POST).path("/v1/auth/token/create");
            then.status(503).body("upstream down");
        });

        let client = client_for(&server, None);
        let err = client
            .create_token(&CROWDSOURCE_TOKEN_REQUEST)
            .await
            .unwrap_err();

        assert!(matches!(err, VaultError::Api { status: 503, ref errors, .. } if errors.is_empty()));
    }

    #[tokio::test]
    async fn test_response_without_auth_is_an_error() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(POST).path("/v1/auth/token/create");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"auth":null,"warnings":null}"#);
        });

        let client = client_for(&server, None);
        let err = client
            .create_token(&CROWDSOURCE_TOKEN_REQUEST)
            .await
            .unwrap_err();

        assert!(matches!(err, VaultError::MissingAuth));
    }

    #[tokio::test]
    async fn test_unreachable_vault_is_a_client_error() {
        let options = VaultOptions {
            address: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..VaultOptions::default()
        };
        let client = VaultClient::new(&options).unwrap();
        let err = client
            .create_token(&CROWDSOURCE_TOKEN_REQUEST)
            .await
            .unwrap_err();

        assert!(matches!(err, VaultError::Client(_)));
    }
}
