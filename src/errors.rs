// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for a snapshot run
//!
//! Every variant except [`SnapError::PruneIncomplete`] is fatal the moment
//! it is raised. A partially failed prune is reported only after every
//! doomed snapshot has been attempted.

use thiserror::Error;

use crate::rpc::RpcError;

/// Exit status for fatal failures
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when the snapshot was created but some deletions were rejected
pub const EXIT_PRUNE_INCOMPLETE: i32 = 2;

#[derive(Error, Debug)]
pub enum SnapError {
    /// Missing or invalid settings, raised before connecting
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Connection, handshake, framing, or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] RpcError),

    /// API key rejected
    #[error("Login failed: {0}")]
    Auth(String),

    /// Snapshot creation rejected
    #[error("Failed to create snapshot {name}: {message}")]
    Create { name: String, message: String },

    /// Snapshot query failed or returned an unusable payload
    #[error("Snapshot query failed: {0}")]
    Query(String),

    /// Creation timestamp was not an integer
    #[error("Invalid creation timestamp {value:?} on snapshot {snapshot}")]
    Parse { snapshot: String, value: String },

    /// A single deletion was rejected
    #[error("Failed to delete snapshot {snapshot}: {message}")]
    Delete { snapshot: String, message: String },

    /// Some deletions were rejected during the prune pass
    #[error("Prune incomplete: {failed} of {attempted} deletions failed")]
    PruneIncomplete { failed: usize, attempted: usize },
}

impl SnapError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            SnapError::PruneIncomplete { .. } => EXIT_PRUNE_INCOMPLETE,
            _ => EXIT_FAILURE,
        }
    }

    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            SnapError::Config(_) => "CONFIG_ERROR",
            SnapError::Transport(_) => "TRANSPORT_ERROR",
            SnapError::Auth(_) => "AUTH_ERROR",
            SnapError::Create { .. } => "CREATE_ERROR",
            SnapError::Query(_) => "QUERY_ERROR",
            SnapError::Parse { .. } => "PARSE_ERROR",
            SnapError::Delete { .. } => "DELETE_ERROR",
            SnapError::PruneIncomplete { .. } => "PRUNE_INCOMPLETE",
        }
    }
}
