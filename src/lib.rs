// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod errors;
pub mod report;
pub mod rpc;
pub mod runner;
pub mod snapshot;

pub use config::SnapConfig;
pub use errors::SnapError;
pub use report::{ConsoleReporter, ProgressEvent, RecordingReporter, Reporter};
pub use rpc::{RpcClient, RpcError, TlsMode, Transport, WsTransport};
pub use runner::{connect, run, RunSummary};
pub use snapshot::{plan_retention, PruneOptions, PruneOutcome, RetentionPlan, SnapshotRecord};
