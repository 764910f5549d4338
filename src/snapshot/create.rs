// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::{json, Value};
use tracing::info;

use super::METHOD_SNAPSHOT_CREATE;
use crate::errors::SnapError;
use crate::rpc::envelope::describe_error;
use crate::rpc::{RpcClient, Transport};

/// Request a recursive snapshot of `dataset` named `name`.
///
/// Returns the server-assigned snapshot id. Duplicate names, unknown
/// datasets and permission problems all come back as `SnapError::Create`.
pub async fn create_snapshot<T: Transport>(
    client: &mut RpcClient<T>,
    dataset: &str,
    name: &str,
) -> Result<String, SnapError> {
    let params = json!({
        "dataset": dataset,
        "name": name,
        "recursive": true,
    });

    let response = client.call(METHOD_SNAPSHOT_CREATE, vec![params]).await?;

    let result = response.into_result().map_err(|error| SnapError::Create {
        name: name.to_string(),
        message: describe_error(&error),
    })?;

    let id = match result.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(SnapError::Create {
                name: name.to_string(),
                message: format!("response has no snapshot id: {}", result),
            })
        }
    };

    info!(dataset, id = %id, "Snapshot created");
    Ok(id)
}
