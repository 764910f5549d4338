// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequential JSON-RPC client

use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use super::envelope::{RpcRequest, RpcResponse};
use super::errors::RpcError;
use super::transport::Transport;

/// Id assigned to the first call on a connection (the login)
pub const FIRST_REQUEST_ID: u64 = 1;

/// Issues one request at a time and waits for its reply
///
/// Request ids start at [`FIRST_REQUEST_ID`] and increase by one per call
/// for the lifetime of the connection.
pub struct RpcClient<T> {
    transport: T,
    next_id: u64,
    call_timeout: Option<Duration>,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: FIRST_REQUEST_ID,
            call_timeout: None,
        }
    }

    /// Bound every round trip; `None` waits indefinitely
    pub fn with_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Id the next call will use
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `method` with `params` and wait for the matching reply.
    ///
    /// The returned response may still carry a server `error`; only
    /// transport and framing failures are reported as `Err`.
    pub async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<RpcResponse, RpcError> {
        let id = self.next_id;
        self.next_id += 1;

        let frame = serde_json::to_string(&RpcRequest::new(id, method, params))?;
        debug!(id, method, "Sending request");

        match self.call_timeout {
            Some(limit) => timeout(limit, self.exchange(id, frame))
                .await
                .map_err(|_| RpcError::Timeout {
                    operation: method.to_string(),
                    secs: limit.as_secs(),
                })?,
            None => self.exchange(id, frame).await,
        }
    }

    async fn exchange(&mut self, id: u64, frame: String) -> Result<RpcResponse, RpcError> {
        self.transport.send_text(frame).await?;

        loop {
            let text = self.transport.recv_text().await?;
            let response: RpcResponse = serde_json::from_str(&text)?;

            if response.is_notification() {
                debug!(msg = ?response.msg, "Skipping notification");
                continue;
            }

            match response.id {
                Some(got) if got != id => {
                    return Err(RpcError::UnexpectedId { expected: id, got });
                }
                _ => {
                    debug!(id, error = response.error.is_some(), "Received reply");
                    return Ok(response);
                }
            }
        }
    }
}
