// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retention pruning
//!
//! Snapshots are scoped by a name prefix, ranked newest first, and
//! everything past the retention count is deleted. Snapshots outside the
//! prefix are never touched.

use serde_json::{json, Value};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::types::{RankedSnapshot, RetentionPlan, SnapshotRecord};
use super::{METHOD_SNAPSHOT_DELETE, METHOD_SNAPSHOT_QUERY};
use crate::errors::SnapError;
use crate::report::{ProgressEvent, Reporter};
use crate::rpc::envelope::describe_error;
use crate::rpc::{RpcClient, Transport};

/// Settings for one prune pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOptions {
    /// Number of newest matching snapshots to keep
    pub keep: i64,
    /// Only snapshots whose short name starts with this are managed
    pub prefix: String,
    /// Report doomed snapshots without deleting them
    pub dry_run: bool,
}

/// A deletion the server rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub shortname: String,
    pub message: String,
}

/// What a prune pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub retained: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
    /// Snapshots that would have been deleted in a dry run
    pub skipped: Vec<String>,
}

impl PruneOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Newest first; ties broken by short name, then id, both descending
fn newest_first(a: &RankedSnapshot, b: &RankedSnapshot) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.shortname.cmp(&a.shortname))
        .then_with(|| b.id.cmp(&a.id))
}

/// Filter `records` by `prefix`, rank newest first, and split at `keep`.
///
/// `keep <= 0` dooms every matching snapshot. Records outside the prefix
/// are dropped before their timestamps are looked at.
pub fn plan_retention(
    records: &[SnapshotRecord],
    prefix: &str,
    keep: i64,
) -> Result<RetentionPlan, SnapError> {
    let mut ranked = Vec::new();
    for record in records {
        let shortname = record.shortname()?;
        if !shortname.starts_with(prefix) {
            continue;
        }
        ranked.push(RankedSnapshot {
            id: record.id.clone(),
            shortname: shortname.to_string(),
            created_at: record.created_at()?,
        });
    }

    ranked.sort_by(newest_first);

    let cut = usize::try_from(keep.max(0))
        .unwrap_or(usize::MAX)
        .min(ranked.len());
    let doomed = ranked.split_off(cut);

    Ok(RetentionPlan {
        retained: ranked,
        doomed,
    })
}

/// Query arguments: filter on the dataset, ask for name ordering
fn query_params(dataset: &str) -> Vec<Value> {
    vec![
        json!([["dataset", "=", dataset]]),
        json!({"order_by": ["name"]}),
    ]
}

/// Fetch every snapshot of `dataset`
pub async fn query_snapshots<T: Transport>(
    client: &mut RpcClient<T>,
    dataset: &str,
) -> Result<Vec<SnapshotRecord>, SnapError> {
    let response = client
        .call(METHOD_SNAPSHOT_QUERY, query_params(dataset))
        .await?;

    let result = response
        .into_result()
        .map_err(|e| SnapError::Query(describe_error(&e)))?;

    if !result.is_array() {
        return Err(SnapError::Query(format!(
            "expected a list of snapshots, got {}",
            result
        )));
    }

    serde_json::from_value(result).map_err(|e| SnapError::Query(e.to_string()))
}

/// Run one prune pass against `dataset`.
///
/// Rejected deletions are reported and collected in the outcome; the loop
/// carries on with the next snapshot. Transport failures abort the pass.
pub async fn prune<T: Transport>(
    client: &mut RpcClient<T>,
    dataset: &str,
    options: &PruneOptions,
    reporter: &mut dyn Reporter,
) -> Result<PruneOutcome, SnapError> {
    reporter.report(ProgressEvent::PruneStarted {
        keep: options.keep,
        prefix: options.prefix.clone(),
    });

    let records = query_snapshots(client, dataset).await?;
    let plan = plan_retention(&records, &options.prefix, options.keep)?;
    info!(
        dataset,
        total = records.len(),
        matching = plan.matching(),
        doomed = plan.doomed.len(),
        "Computed retention plan"
    );

    let mut outcome = PruneOutcome {
        retained: plan.retained.iter().map(|s| s.shortname.clone()).collect(),
        ..Default::default()
    };

    for snapshot in plan.doomed {
        if options.dry_run {
            reporter.report(ProgressEvent::WouldDelete {
                shortname: snapshot.shortname.clone(),
                created_at: snapshot.created_at,
            });
            outcome.skipped.push(snapshot.shortname);
            continue;
        }

        reporter.report(ProgressEvent::Deleting {
            shortname: snapshot.shortname.clone(),
            created_at: snapshot.created_at,
        });

        let response = client
            .call(METHOD_SNAPSHOT_DELETE, vec![json!(snapshot.id)])
            .await?;

        match response.into_result() {
            Ok(_) => {
                debug!(id = %snapshot.id, "Snapshot deleted");
                outcome.deleted.push(snapshot.shortname);
            }
            Err(error) => {
                let message = describe_error(&error);
                let rejected = SnapError::Delete {
                    snapshot: snapshot.id.clone(),
                    message: message.clone(),
                };
                warn!(code = rejected.error_code(), "{}", rejected);
                reporter.report(ProgressEvent::DeleteFailed {
                    shortname: snapshot.shortname.clone(),
                    message: message.clone(),
                });
                outcome.failed.push(FailedDeletion {
                    shortname: snapshot.shortname,
                    message,
                });
            }
        }
    }

    reporter.report(ProgressEvent::PruneCompleted {
        retained: outcome.retained.len(),
        deleted: outcome.deleted.len(),
        failed: outcome.failed.len(),
        would_delete: outcome.skipped.len(),
    });

    Ok(outcome)
}
