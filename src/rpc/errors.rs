// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transport and codec level errors

use thiserror::Error;

/// Errors raised while exchanging frames with the middleware
#[derive(Error, Debug)]
pub enum RpcError {
    /// Endpoint could not be reached or the WebSocket handshake failed
    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// TLS connector could not be built
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// Writing a frame failed
    #[error("Failed to send request: {0}")]
    Send(String),

    /// Reading a frame failed
    #[error("Failed to receive reply: {0}")]
    Receive(String),

    /// Peer closed the connection while a reply was pending
    #[error("Connection closed by server")]
    Closed,

    /// No reply within the configured round-trip limit
    #[error("Timed out after {secs}s waiting for {operation}")]
    Timeout { operation: String, secs: u64 },

    /// Frame could not be encoded or decoded
    #[error("Malformed frame: {0}")]
    Codec(#[from] serde_json::Error),

    /// Reply did not belong to the pending request
    #[error("Unexpected reply id {got}, expected {expected}")]
    UnexpectedId { expected: u64, got: u64 },
}
