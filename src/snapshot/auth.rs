// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::{json, Value};
use tracing::info;

use super::METHOD_LOGIN_WITH_API_KEY;
use crate::errors::SnapError;
use crate::rpc::envelope::describe_error;
use crate::rpc::{RpcClient, Transport};

/// Log in with an API key.
///
/// Must be the first call on the connection so it carries request id 1.
/// A server error or a `false` result both mean the key was rejected.
pub async fn authenticate<T: Transport>(
    client: &mut RpcClient<T>,
    api_key: &str,
) -> Result<(), SnapError> {
    let response = client
        .call(METHOD_LOGIN_WITH_API_KEY, vec![json!(api_key)])
        .await?;

    match response.into_result() {
        Err(error) => Err(SnapError::Auth(describe_error(&error))),
        Ok(Value::Bool(false)) => Err(SnapError::Auth("API key rejected".to_string())),
        Ok(_) => {
            info!("Authenticated with API key");
            Ok(())
        }
    }
}
