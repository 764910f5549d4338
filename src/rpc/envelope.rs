// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request and response envelopes exchanged with the middleware

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol identifier carried by every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Message kind for method invocations
pub const METHOD_MSG: &str = "method";

/// Outgoing request envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub msg: String,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            msg: METHOD_MSG.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// Incoming frame from the middleware
///
/// Either `result` or `error` is set on a reply. Frames with neither and no
/// `id` are unsolicited notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id: Some(id),
            msg: Some("result".to_string()),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: Value) -> Self {
        Self {
            id: Some(id),
            msg: Some("result".to_string()),
            result: None,
            error: Some(error),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.result.is_none() && self.error.is_none()
    }

    /// Split into the success payload or the server diagnostic.
    ///
    /// An error field wins over a result field. A reply with neither is a
    /// success carrying `null`.
    pub fn into_result(self) -> Result<Value, Value> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Render a server diagnostic for operator output.
///
/// The middleware sends either a string or an object with `reason`/`message`.
pub fn describe_error(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("reason")
            .or_else(|| map.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}
