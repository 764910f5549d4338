// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::env;
use tracing_subscriber::EnvFilter;
use truenas_snap::cli::{execute, usage_exit_code, Cli, DEFAULT_LOG_FILTER};
use truenas_snap::errors::{SnapError, EXIT_FAILURE};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Progress goes to stdout; keep diagnostics quiet unless asked for
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", DEFAULT_LOG_FILTER);
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            if let Err(io) = e.print() {
                eprintln!("{}", io);
            }
            std::process::exit(code);
        }
    };

    match execute(cli).await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<SnapError>()
                .map(SnapError::exit_code)
                .unwrap_or(EXIT_FAILURE);
            std::process::exit(code);
        }
    }
}
