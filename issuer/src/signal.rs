// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// Resolves on the first interrupt (Ctrl+C / SIGINT).
///
/// The handler stays installed afterwards, so a second interrupt while
/// draining is swallowed instead of killing the process.
pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("[issuer] failed to install interrupt handler: {}", error);
        std::future::pending::<()>().await;
        return;
    }
    tracing::info!("[issuer] received interrupt");
}
