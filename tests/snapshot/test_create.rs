// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::json;
use truenas_snap::rpc::RpcClient;
use truenas_snap::snapshot::create_snapshot;
use truenas_snap::SnapError;

use super::mock_transport::{MockAppliance, DATASET};

#[tokio::test]
async fn test_create_sends_recursive_request() {
    let mut client = RpcClient::new(MockAppliance::new());
    let id = create_snapshot(&mut client, DATASET, "backup-2025-11-23_12-01")
        .await
        .unwrap();
    assert_eq!(id, "tank/data@backup-2025-11-23_12-01");

    let appliance = client.into_transport();
    assert_eq!(appliance.methods(), vec!["pool.snapshot.create"]);
    assert_eq!(
        appliance.requests[0].params,
        vec![json!({
            "dataset": "tank/data",
            "name": "backup-2025-11-23_12-01",
            "recursive": true,
        })]
    );
}

#[tokio::test]
async fn test_create_error_carries_reason() {
    let appliance = MockAppliance {
        create_error: Some(json!({"error": 17, "reason": "[EEXIST] snapshot already exists"})),
        ..Default::default()
    };
    let mut client = RpcClient::new(appliance);

    let err = create_snapshot(&mut client, DATASET, "backup-1")
        .await
        .unwrap_err();
    match err {
        SnapError::Create { name, message } => {
            assert_eq!(name, "backup-1");
            assert_eq!(message, "[EEXIST] snapshot already exists");
        }
        other => panic!("expected create error, got {:?}", other),
    }
}
