// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::{ArgAction, Args, Parser};

use crate::constants::{
    DEFAULT_LISTEN, DEFAULT_VAULT_ADDR, DEFAULT_VAULT_CLIENT_TIMEOUT_SECS, ENV_VAULT_ENDPOINT,
};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct IssuerOptions {
    /// address and port to listen
    #[arg(long, default_value = DEFAULT_LISTEN, env("ISSUER_LISTEN"))]
    pub listen: String,
    /// Vault address handed out to callers alongside their token
    #[arg(long, default_value = "", env(ENV_VAULT_ENDPOINT), hide_env_values = true)]
    pub endpoint: String,
    #[command(flatten)]
    pub vault: VaultOptions,
    /// Positional arguments are not accepted; collected so they can be rejected.
    #[arg(hide = true)]
    pub args: Vec<String>,
}

/// Connection settings for the Vault the service itself talks to.
#[derive(Clone, Args)]
pub struct VaultOptions {
    #[arg(long = "vault-addr", default_value = DEFAULT_VAULT_ADDR, env("VAULT_ADDR"))]
    pub address: String,
    #[arg(long = "vault-token", env("VAULT_TOKEN"), hide_env_values = true)]
    pub token: Option<String>,
    #[arg(long = "vault-skip-verify", default_value = "false", env("VAULT_SKIP_VERIFY"), action = ArgAction::SetTrue)]
    pub skip_verify: bool,
    /// seconds to wait for a Vault response
    #[arg(long = "vault-client-timeout", default_value_t = DEFAULT_VAULT_CLIENT_TIMEOUT_SECS, env("VAULT_CLIENT_TIMEOUT"))]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for VaultOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultOptions")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("skip_verify", &self.skip_verify)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Validated, immutable settings shared by the server and its handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    /// Socket address to bind, with a bare `:port` expanded to all interfaces.
    pub listen: String,
    /// Vault address advertised in every `/token.json` response.
    pub endpoint: String,
}

impl IssuerOptions {
    pub fn into_config(self) -> Result<IssuerConfig, ConfigError> {
        if !self.args.is_empty() {
            return Err(ConfigError::TooManyArguments(self.args.len()));
        }
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        Ok(IssuerConfig {
            listen: normalize_listen(&self.listen),
            endpoint: self.endpoint,
        })
    }
}

/// `:6789` binds every interface, IPv6 and IPv4, like `[::]:6789`.
fn normalize_listen(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("[::]{listen}")
    } else {
        listen.to_string()
    }
}

impl Default for IssuerOptions {
    fn default() -> Self {
        IssuerOptions {
            listen: "127.0.0.1:0".to_string(),
            endpoint: String::new(),
            vault: VaultOptions::default(),
            args: Vec::new(),
        }
    }
}

impl Default for VaultOptions {
    fn default() -> Self {
        VaultOptions {
            address: DEFAULT_VAULT_ADDR.to_string(),
            token: None,
            skip_verify: false,
            timeout_secs: DEFAULT_VAULT_CLIENT_TIMEOUT_SECS,
        }
    }
}
