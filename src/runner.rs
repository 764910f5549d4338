// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One snapshot run: login, create, optional prune
//!
//! Calls are issued strictly one after another on a single connection.
//! The first failure ends the run, except for rejected deletions which are
//! collected and turned into [`SnapError::PruneIncomplete`] at the end.

use tokio::time::timeout;
use tracing::info;

use crate::config::SnapConfig;
use crate::errors::SnapError;
use crate::report::{ProgressEvent, Reporter};
use crate::rpc::{RpcClient, RpcError, Transport, WsTransport};
use crate::snapshot::{authenticate, create_snapshot, prune, PruneOutcome};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub snapshot_id: String,
    pub prune: Option<PruneOutcome>,
}

/// Open the WebSocket connection described by `config`
pub async fn connect(config: &SnapConfig) -> Result<RpcClient<WsTransport>, SnapError> {
    let url = config.endpoint_url()?;
    info!(url = %url, "Connecting");

    let connecting = WsTransport::connect(url.as_str(), config.tls);
    let transport = match config.timeout {
        Some(limit) => timeout(limit, connecting)
            .await
            .map_err(|_| RpcError::Timeout {
                operation: format!("connection to {}", url),
                secs: limit.as_secs(),
            })??,
        None => connecting.await?,
    };

    Ok(RpcClient::new(transport).with_timeout(config.timeout))
}

/// Drive a full run over an already connected client
pub async fn run<T: Transport>(
    client: &mut RpcClient<T>,
    config: &SnapConfig,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary, SnapError> {
    authenticate(client, &config.api_key).await?;
    reporter.report(ProgressEvent::LoggedIn);

    reporter.report(ProgressEvent::CreatingSnapshot {
        name: config.snapshot_name.clone(),
    });
    let snapshot_id = create_snapshot(client, &config.dataset, &config.snapshot_name).await?;
    reporter.report(ProgressEvent::SnapshotCreated {
        id: snapshot_id.clone(),
    });

    let pruned = match &config.prune {
        Some(options) => {
            let outcome = prune(client, &config.dataset, options, reporter).await?;
            if !outcome.is_complete() {
                return Err(SnapError::PruneIncomplete {
                    failed: outcome.failed.len(),
                    attempted: outcome.failed.len() + outcome.deleted.len(),
                });
            }
            Some(outcome)
        }
        None => None,
    };

    Ok(RunSummary {
        snapshot_id,
        prune: pruned,
    })
}
