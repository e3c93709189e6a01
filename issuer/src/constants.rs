// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

use crate::models::TokenCreateRequest;

pub const DEFAULT_LISTEN: &str = ":6789";
pub const ENV_VAULT_ENDPOINT: &str = "VAULT_ENDPOINT";
pub const DEFAULT_VAULT_ADDR: &str = "https://127.0.0.1:8200";
pub const DEFAULT_VAULT_CLIENT_TIMEOUT_SECS: u64 = 60;

/// Policies attached to every issued token.
pub const VAULT_POLICY_CROWDSOURCE: &str = "crowdsource";
pub const VAULT_POLICY_DEFAULT: &str = "default";
pub const VAULT_POLICIES: &[&str] = &[VAULT_POLICY_CROWDSOURCE, VAULT_POLICY_DEFAULT];
/// Total number of uses allowed for an issued token.
pub const VAULT_NUM_USES: u32 = 5;
/// Both the implicit and the explicit maximum lifetime of an issued token.
pub const VAULT_TTL: &str = "5m";

/// The only token shape this service ever asks Vault for.
pub const CROWDSOURCE_TOKEN_REQUEST: TokenCreateRequest = TokenCreateRequest {
    policies: VAULT_POLICIES,
    num_uses: VAULT_NUM_USES,
    ttl: VAULT_TTL,
    explicit_max_ttl: VAULT_TTL,
};

pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

pub const SERVER_HEADER: &str = concat!("token-issuer/", env!("CARGO_PKG_VERSION"));
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_ICON: &str = "image/x-icon";

// Process exit codes
pub const EXIT_MISCONFIGURED: u8 = 127;
pub const EXIT_FAILURE: u8 = 1;
