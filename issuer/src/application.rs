// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::future::Future;
use std::io::ErrorKind;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::configuration::IssuerConfig;
use crate::constants::{ACCEPT_ERROR_BACKOFF, SERVER_HEADER, SHUTDOWN_TIMEOUT};
use crate::errors::{ServeError, StartupError};
use crate::routes;
use crate::vault::CredentialBackend;

pub struct AppState<B> {
    pub config: IssuerConfig,
    pub backend: B,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    shutdown_timeout: Duration,
}

impl Application {
    /// Binds the listen address. Failing to bind is fatal; there is no fallback port.
    pub async fn build<B: CredentialBackend>(
        config: IssuerConfig,
        backend: B,
    ) -> Result<Self, StartupError> {
        let listener = bind(&config.listen).await?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind {
                address: config.listen.clone(),
                source,
            })?;

        tracing::info!("[issuer] Server is listening on {}", local_addr);

        Ok(Self {
            port: local_addr.port(),
            listener,
            router: create_router(config, backend),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Serves until `shutdown` resolves, then drains.
    ///
    /// Once `shutdown` fires the listener is closed and in-flight requests get
    /// up to the shutdown timeout to finish. Connections still open after that
    /// are closed forcibly and [`ServeError::DrainTimeout`] is returned.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send,
    {
        let graceful = GracefulShutdown::new();
        let mut connections = JoinSet::new();
        let mut shutdown = pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, remote) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!("[issuer] failed to accept connection: {}", e);
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };
                    let service = TowerToHyperService::new(self.router.clone());
                    let connection = graceful.watch(
                        http1::Builder::new()
                            .timer(TokioTimer::new())
                            .serve_connection(TokioIo::new(stream), service),
                    );
                    connections.spawn(async move {
                        if let Err(e) = connection.await {
                            tracing::debug!("[issuer] connection from {} failed: {}", remote, e);
                        }
                    });
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("[issuer] Shutting down server...");
        drop(self.listener);

        match tokio::time::timeout(self.shutdown_timeout, graceful.shutdown()).await {
            Ok(()) => {
                while connections.join_next().await.is_some() {}
                Ok(())
            }
            Err(_) => {
                // aborting the tasks drops their sockets
                connections.shutdown().await;
                Err(ServeError::DrainTimeout(self.shutdown_timeout))
            }
        }
    }
}

/// Binds `address`. The dual-stack wildcard `[::]` falls back to `0.0.0.0`
/// on hosts without IPv6.
async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    let error = match TcpListener::bind(address).await {
        Ok(listener) => return Ok(listener),
        Err(error) => error,
    };

    let port = address.strip_prefix("[::]:");
    if let (Some(port), false) = (port, error.kind() == ErrorKind::AddrInUse) {
        let ipv4 = format!("0.0.0.0:{port}");
        tracing::warn!("[issuer] cannot bind {} ({}), using {}", address, error, ipv4);
        return TcpListener::bind(&ipv4)
            .await
            .map_err(|source| StartupError::Bind {
                address: ipv4,
                source,
            });
    }

    Err(StartupError::Bind {
        address: address.to_string(),
        source: error,
    })
}

/// Builds the router with every route and middleware used in production.
///
/// Unmatched paths serve the landing page. `/health` is added after the trace
/// layer so probes stay out of the access log.
pub fn create_router<B: CredentialBackend>(config: IssuerConfig, backend: B) -> Router {
    let state = Arc::new(AppState { config, backend });

    Router::new()
        .route("/", get(routes::index))
        .route("/favicon.ico", get(routes::favicon))
        .route("/token.json", get(routes::issue_token::<B>))
        .fallback(routes::index)
        .layer(TraceLayer::new_for_http())
        .route("/health", get(routes::health))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::SERVER,
            HeaderValue::from_static(SERVER_HEADER),
        ))
        .with_state(state)
}
