// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Process lifecycle: start the server, wait for one shutdown notification,
//! drain, stop.
//!
//! ```text
//! Stopped -> Starting -> Running -> Draining -> Stopped
//!               |
//!               +-> Stopped (config, backend or bind failure)
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::application::Application;
use crate::configuration::{IssuerConfig, IssuerOptions};
use crate::constants::SHUTDOWN_TIMEOUT;
use crate::errors::{ServeError, StartupError};
use crate::vault::{CredentialBackend, VaultClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Draining,
}

/// Sole owner of the [`LifecycleState`]. Observers follow it with [`Lifecycle::subscribe`].
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
    shutdown_timeout: Duration,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Stopped);
        Self {
            state,
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.send_replace(next);
        tracing::debug!("[issuer] lifecycle {:?} -> {:?}", previous, next);
    }

    /// Validates `options`, builds the Vault client and serves until `shutdown` resolves.
    pub async fn run<F>(&self, options: IssuerOptions, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send,
    {
        self.transition(LifecycleState::Starting);

        let vault_options = options.vault.clone();
        let config = options.into_config().inspect_err(|_| {
            self.transition(LifecycleState::Stopped);
        })?;
        let backend = VaultClient::new(&vault_options).map_err(|e| {
            self.transition(LifecycleState::Stopped);
            StartupError::Backend(e)
        })?;

        self.serve(config, backend, shutdown).await
    }

    /// Like [`Lifecycle::run`] but with an already validated config and backend.
    pub async fn run_with_backend<B, F>(
        &self,
        config: IssuerConfig,
        backend: B,
        shutdown: F,
    ) -> Result<(), StartupError>
    where
        B: CredentialBackend,
        F: Future<Output = ()> + Send,
    {
        self.transition(LifecycleState::Starting);
        self.serve(config, backend, shutdown).await
    }

    async fn serve<B, F>(
        &self,
        config: IssuerConfig,
        backend: B,
        shutdown: F,
    ) -> Result<(), StartupError>
    where
        B: CredentialBackend,
        F: Future<Output = ()> + Send,
    {
        let application = match Application::build(config, backend).await {
            Ok(application) => application.with_shutdown_timeout(self.shutdown_timeout),
            Err(e) => {
                self.transition(LifecycleState::Stopped);
                return Err(e);
            }
        };

        self.transition(LifecycleState::Running);

        // the shutdown future is consumed here, so it can only trigger draining once
        let draining = async {
            shutdown.await;
            self.transition(LifecycleState::Draining);
        };
        let result = application.run_until_stopped(draining).await;

        self.transition(LifecycleState::Stopped);

        match result {
            Ok(()) => tracing::info!("[issuer] Server is stopped!"),
            Err(ServeError::DrainTimeout(timeout)) => tracing::warn!(
                "[issuer] connections still open after {:?}, closed forcibly",
                timeout
            ),
        }

        Ok(())
    }
}
