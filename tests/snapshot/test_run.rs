// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::json;
use std::time::Duration;
use truenas_snap::report::{ProgressEvent, RecordingReporter};
use truenas_snap::rpc::{RpcClient, TlsMode};
use truenas_snap::snapshot::PruneOptions;
use truenas_snap::{run, SnapConfig, SnapError};

use super::mock_transport::{MockAppliance, DATASET};

fn config(prune: Option<i64>) -> SnapConfig {
    SnapConfig {
        host: "nas.local".to_string(),
        api_key: "1-secret".to_string(),
        dataset: DATASET.to_string(),
        snapshot_name: "backup-E".to_string(),
        prune: prune.map(|keep| PruneOptions {
            keep,
            prefix: "backup-".to_string(),
            dry_run: false,
        }),
        timeout: Some(Duration::from_secs(5)),
        tls: TlsMode::Verify,
    }
}

#[tokio::test]
async fn test_full_run_sequence() {
    let mut client = RpcClient::new(MockAppliance::standard());
    let mut reporter = RecordingReporter::new();

    let summary = run(&mut client, &config(Some(2)), &mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.snapshot_id, "tank/data@backup-E");
    let outcome = summary.prune.unwrap();
    assert_eq!(outcome.deleted, vec!["backup-A"]);

    let appliance = client.into_transport();
    assert_eq!(
        appliance.methods(),
        vec![
            "auth.login_with_api_key",
            "pool.snapshot.create",
            "pool.snapshot.query",
            "pool.snapshot.delete"
        ]
    );
    assert_eq!(appliance.ids(), vec![1, 2, 3, 4]);

    assert_eq!(
        &reporter.events[..3],
        &[
            ProgressEvent::LoggedIn,
            ProgressEvent::CreatingSnapshot {
                name: "backup-E".to_string()
            },
            ProgressEvent::SnapshotCreated {
                id: "tank/data@backup-E".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_without_prune_stops_after_create() {
    let mut client = RpcClient::new(MockAppliance::standard());
    let mut reporter = RecordingReporter::new();

    let summary = run(&mut client, &config(None), &mut reporter)
        .await
        .unwrap();

    assert!(summary.prune.is_none());
    assert_eq!(
        client.transport().methods(),
        vec!["auth.login_with_api_key", "pool.snapshot.create"]
    );
}

#[tokio::test]
async fn test_failed_login_stops_run() {
    let appliance = MockAppliance {
        reject_login: true,
        ..MockAppliance::standard()
    };
    let mut client = RpcClient::new(appliance);
    let mut reporter = RecordingReporter::new();

    let err = run(&mut client, &config(Some(1)), &mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, SnapError::Auth(_)));
    assert_eq!(client.transport().methods(), vec!["auth.login_with_api_key"]);
    assert!(reporter.events.is_empty());
}

#[tokio::test]
async fn test_create_error_skips_pruning() {
    let appliance = MockAppliance {
        create_error: Some(json!({"reason": "permission denied"})),
        ..MockAppliance::standard()
    };
    let mut client = RpcClient::new(appliance);
    let mut reporter = RecordingReporter::new();

    let err = run(&mut client, &config(Some(0)), &mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, SnapError::Create { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!client
        .transport()
        .methods()
        .contains(&"pool.snapshot.query"));
    assert!(!reporter
        .events
        .iter()
        .any(|e| matches!(e, ProgressEvent::PruneStarted { .. })));
}

#[tokio::test]
async fn test_rejected_delete_yields_incomplete_exit() {
    let appliance = MockAppliance::standard().reject_delete("backup-A");
    let mut client = RpcClient::new(appliance);
    let mut reporter = RecordingReporter::new();

    let err = run(&mut client, &config(Some(1)), &mut reporter)
        .await
        .unwrap_err();

    match err {
        SnapError::PruneIncomplete { failed, attempted } => {
            assert_eq!(failed, 1);
            assert_eq!(attempted, 2);
        }
        ref other => panic!("expected incomplete prune, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 2);
    // every doomed snapshot was still attempted
    assert_eq!(client.transport().delete_calls().len(), 2);
}
