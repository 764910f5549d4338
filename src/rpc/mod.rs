// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON-RPC over WebSocket plumbing for the appliance middleware API
//!
//! The client is strictly sequential: one request is written, then frames
//! are read until the reply carrying the same id arrives. Nothing is ever
//! pipelined, so a single pending id is all the correlation state needed.

pub mod client;
pub mod envelope;
pub mod errors;
pub mod transport;

pub use client::RpcClient;
pub use envelope::{RpcRequest, RpcResponse, JSONRPC_VERSION, METHOD_MSG};
pub use errors::RpcError;
pub use transport::{TlsMode, Transport, WsTransport};
