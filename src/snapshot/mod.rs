// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot operations against the appliance middleware
//!
//! - `auth`: API key login, always the first call on a connection
//! - `create`: recursive snapshot creation
//! - `prune`: prefix-scoped retention

pub mod auth;
pub mod create;
pub mod prune;
pub mod types;

pub use auth::authenticate;
pub use create::create_snapshot;
pub use prune::{
    plan_retention, prune, query_snapshots, FailedDeletion, PruneOptions, PruneOutcome,
};
pub use types::{RankedSnapshot, RetentionPlan, SnapshotRecord};

pub const METHOD_LOGIN_WITH_API_KEY: &str = "auth.login_with_api_key";
pub const METHOD_SNAPSHOT_CREATE: &str = "pool.snapshot.create";
pub const METHOD_SNAPSHOT_QUERY: &str = "pool.snapshot.query";
pub const METHOD_SNAPSHOT_DELETE: &str = "pool.snapshot.delete";
