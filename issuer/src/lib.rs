// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Token Issuer
//!
//! Hands out short-lived, heavily constrained HashiCorp Vault tokens to
//! anonymous callers without exposing Vault itself.
//!
//! ## Architecture
//!
//! ```text
//! Client -> HTTP API (this crate) -> Vault auth/token/create
//! ```
//!
//! Every token is created with the same compiled-in constraints: the
//! `crowdsource` and `default` policies, 5 uses, and a 5 minute TTL that is
//! also its explicit maximum. Nothing the caller sends can change them.
//!
//! ## Modules
//!
//! - [`application`]: HTTP server setup with Axum and bounded graceful shutdown
//! - [`assets`]: landing page and favicon compiled into the binary
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: token constraints and other fixed values
//! - [`errors`]: error types with HTTP response and exit code mapping
//! - [`lifecycle`]: start, wait for interrupt, drain, stop
//! - [`models`]: request/response types
//! - [`routes`]: HTTP route handlers (index, favicon, token, health)
//! - [`signal`]: interrupt notification
//! - [`vault`]: credential backend trait and the Vault client
//!
//! ## Usage
//!
//! ```bash
//! VAULT_ENDPOINT=https://vault.example.com VAULT_TOKEN=... token-issuer --listen :6789
//! ```
//!
//! ## Security Considerations
//!
//! - Issued tokens are zeroized on drop and never logged; only accessors are
//! - Every backend failure is reported to callers as 403 with no retry hint
//! - No retry, caching or rate limiting is applied to token creation

pub mod application;
pub mod assets;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod routes;
pub mod signal;
pub mod vault;
