// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Body of a Vault `auth/token/create` request.
///
/// Every field is `'static` so the constraints can live in a `const` and never
/// be built from request input. See [`crate::constants::CROWDSOURCE_TOKEN_REQUEST`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenCreateRequest {
    pub policies: &'static [&'static str],
    pub num_uses: u32,
    pub ttl: &'static str,
    pub explicit_max_ttl: &'static str,
}

/// A token issued by the credential backend.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// The secret token value handed to the caller.
    pub client_token: String,
    /// Non-secret handle to the token, safe to log.
    pub accessor: String,
}

impl Credential {
    pub fn new(client_token: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            client_token: client_token.into(),
            accessor: accessor.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_token", &"[REDACTED]")
            .field("accessor", &self.accessor)
            .finish()
    }
}

/// JSON returned from `GET /token.json`.
#[derive(Debug, Serialize)]
pub struct TokenResponse<'a> {
    pub endpoint: &'a str,
    pub token: &'a str,
}

/// The subset of Vault's response to `auth/token/create` that we read.
#[derive(Deserialize)]
pub(crate) struct VaultSecret {
    pub auth: Option<VaultAuth>,
}

#[derive(Deserialize, ZeroizeOnDrop)]
pub(crate) struct VaultAuth {
    pub client_token: String,
    #[serde(default)]
    pub accessor: String,
}

/// Vault's error envelope, `{"errors": ["..."]}`.
#[derive(Deserialize, Default)]
pub(crate) struct VaultErrors {
    #[serde(default)]
    pub errors: Vec<String>,
}
