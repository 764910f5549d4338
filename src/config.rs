// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Validated run configuration

use std::fmt;
use std::time::Duration;
use url::Url;

use crate::errors::SnapError;
use crate::rpc::TlsMode;
use crate::snapshot::PruneOptions;

/// Prefix used to scope pruning when none is given
pub const DEFAULT_PREFIX: &str = "backup-";

/// Round-trip limit in seconds when none is given
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the versioned JSON-RPC endpoint
pub const API_PATH: &str = "/api/current";

/// Everything a single run needs
#[derive(Clone)]
pub struct SnapConfig {
    /// Appliance host, optionally with `:port`
    pub host: String,
    pub api_key: String,
    pub dataset: String,
    pub snapshot_name: String,
    /// Prune pass to run after creation, if any
    pub prune: Option<PruneOptions>,
    /// Limit for connecting and for each call; `None` waits forever
    pub timeout: Option<Duration>,
    pub tls: TlsMode,
}

// API key stays out of logs
impl fmt::Debug for SnapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("dataset", &self.dataset)
            .field("snapshot_name", &self.snapshot_name)
            .field("prune", &self.prune)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .finish()
    }
}

impl SnapConfig {
    /// `wss://<host>/api/current`
    pub fn endpoint_url(&self) -> Result<Url, SnapError> {
        let url = Url::parse(&format!("wss://{}{}", self.host, API_PATH))
            .map_err(|e| SnapError::Config(format!("invalid host {:?}: {}", self.host, e)))?;

        if url.host_str().is_none() || url.path() != API_PATH || url.query().is_some() {
            return Err(SnapError::Config(format!(
                "host must be a bare host name or host:port, got {:?}",
                self.host
            )));
        }
        Ok(url)
    }

    /// Check the configuration before any connection is opened
    pub fn validate(&self) -> Result<(), SnapError> {
        if self.host.trim().is_empty() {
            return Err(SnapError::Config("--host is required".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(SnapError::Config("--token is required".to_string()));
        }
        if self.dataset.trim().is_empty() {
            return Err(SnapError::Config("--dataset is required".to_string()));
        }
        if self.dataset.contains('@') {
            return Err(SnapError::Config(format!(
                "dataset {:?} must not contain '@'",
                self.dataset
            )));
        }
        if self.snapshot_name.trim().is_empty() {
            return Err(SnapError::Config("snapshot name must not be empty".to_string()));
        }
        if self.snapshot_name.contains('@') {
            return Err(SnapError::Config(format!(
                "snapshot name {:?} must not contain '@'",
                self.snapshot_name
            )));
        }
        self.endpoint_url()?;
        Ok(())
    }
}
