// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{SnapConfig, DEFAULT_PREFIX, DEFAULT_TIMEOUT_SECS};
use crate::errors::{SnapError, EXIT_FAILURE};
use crate::report::ConsoleReporter;
use crate::rpc::TlsMode;
use crate::runner::{self, RunSummary};
use crate::snapshot::PruneOptions;

/// `RUST_LOG` filter used when none is set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// TrueNAS snapshot CLI
#[derive(Parser, Debug)]
#[command(name = "truenas-snap")]
#[command(version)]
#[command(
    about = "Create and optionally prune TrueNAS ZFS snapshots over WebSocket",
    long_about = None
)]
pub struct Cli {
    /// Snapshot name to create (e.g. backup-2025-11-23_12-01)
    pub snapname: String,

    /// Dataset to snapshot (e.g. tank/data)
    #[arg(long, env = "TRUENAS_DATASET")]
    pub dataset: Option<String>,

    /// Appliance host name or host:port
    #[arg(long, env = "TRUENAS_HOST")]
    pub host: Option<String>,

    /// API key (can also be set via TRUENAS_API_KEY env var)
    #[arg(long, env = "TRUENAS_API_KEY", hide_env_values = true)]
    pub token: Option<String>,

    /// Keep only the last N snapshots with the same prefix
    #[arg(long, value_name = "N")]
    pub prune: Option<u32>,

    /// Prefix used to match snapshots for pruning
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Seconds to wait for the connection and for each reply (0 waits forever)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Accept any TLS certificate from the appliance
    #[arg(long, env = "TRUENAS_INSECURE")]
    pub insecure: bool,

    /// Show which snapshots pruning would delete without deleting them
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Build the validated run configuration
    pub fn into_config(self) -> Result<SnapConfig, SnapError> {
        let prune = match self.prune {
            // zero keeps pruning off rather than deleting every match
            Some(0) => {
                warn!("--prune 0 leaves pruning disabled");
                None
            }
            Some(keep) => Some(PruneOptions {
                keep: i64::from(keep),
                prefix: self.prefix,
                dry_run: self.dry_run,
            }),
            None => None,
        };

        let config = SnapConfig {
            host: self.host.unwrap_or_default(),
            api_key: self.token.unwrap_or_default(),
            dataset: self.dataset.unwrap_or_default(),
            snapshot_name: self.snapname,
            prune,
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            tls: if self.insecure {
                TlsMode::AcceptInvalidCerts
            } else {
                TlsMode::Verify
            },
        };

        config.validate()?;
        Ok(config)
    }
}

/// Exit code for an argument parse failure.
///
/// Help and version output exit cleanly; everything else is a usage error
/// and must not be mistaken for an incomplete prune.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        0
    }
}

/// Execute a run with console output
pub async fn execute(cli: Cli) -> Result<RunSummary> {
    let config = cli.into_config()?;
    debug!(?config, "Starting snapshot run");

    let mut client = runner::connect(&config).await?;
    let mut reporter = ConsoleReporter::stdout();
    let outcome = runner::run(&mut client, &config, &mut reporter).await;

    client.into_transport().close().await;

    outcome.with_context(|| format!("snapshot run on {} failed", config.dataset))
}
