// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::process::ExitCode;

use clap::Parser;
use token_issuer::configuration::IssuerOptions;
use token_issuer::lifecycle::Lifecycle;
use token_issuer::signal::shutdown_signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from the command line and environment variables
    let options = IssuerOptions::parse();

    tracing::info!("[issuer] {:?}", &options);

    match Lifecycle::new().run(options, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("[issuer] {}", e);
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
