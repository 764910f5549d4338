// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Operator-facing progress reporting
//!
//! Every line the tool prints to stdout goes through a [`Reporter`] as a
//! typed [`ProgressEvent`]. Diagnostics go to `tracing` instead.

use chrono::DateTime;
use std::fmt;
use std::io::{self, Stdout, Write};
use tracing::{debug, warn};

/// Significant steps of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    LoggedIn,
    CreatingSnapshot {
        name: String,
    },
    SnapshotCreated {
        id: String,
    },
    PruneStarted {
        keep: i64,
        prefix: String,
    },
    Deleting {
        shortname: String,
        created_at: i64,
    },
    /// Dry run: snapshot would have been deleted
    WouldDelete {
        shortname: String,
        created_at: i64,
    },
    DeleteFailed {
        shortname: String,
        message: String,
    },
    PruneCompleted {
        retained: usize,
        deleted: usize,
        failed: usize,
        /// Dry run: snapshots that would have been deleted
        would_delete: usize,
    },
}

fn format_creation(created_at: i64) -> String {
    DateTime::from_timestamp(created_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| created_at.to_string())
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::LoggedIn => write!(f, "Logged in"),
            ProgressEvent::CreatingSnapshot { name } => write!(f, "Creating snapshot: {}", name),
            ProgressEvent::SnapshotCreated { id } => write!(f, "OK: {}", id),
            ProgressEvent::PruneStarted { keep, prefix } => write!(
                f,
                "Pruning snapshots, keeping last {} with prefix '{}'",
                keep, prefix
            ),
            ProgressEvent::Deleting {
                shortname,
                created_at,
            } => write!(
                f,
                "Deleting: {} (created {})",
                shortname,
                format_creation(*created_at)
            ),
            ProgressEvent::WouldDelete {
                shortname,
                created_at,
            } => write!(
                f,
                "Would delete: {} (created {})",
                shortname,
                format_creation(*created_at)
            ),
            ProgressEvent::DeleteFailed { shortname, message } => {
                write!(f, "Delete failed: {}: {}", shortname, message)
            }
            ProgressEvent::PruneCompleted {
                retained,
                deleted,
                failed,
                would_delete,
            } => {
                if *would_delete > 0 {
                    return write!(
                        f,
                        "Prune completed (dry run): {} would be deleted, {} retained",
                        would_delete, retained
                    );
                }
                write!(
                    f,
                    "Prune completed: {} deleted, {} retained",
                    deleted, retained
                )?;
                if *failed > 0 {
                    write!(f, ", {} failed", failed)?;
                }
                Ok(())
            }
        }
    }
}

/// Sink for progress events
pub trait Reporter {
    fn report(&mut self, event: ProgressEvent);
}

/// Prints one line per event
pub struct ConsoleReporter<W = Stdout> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: ProgressEvent) {
        debug!(?event, "progress");
        if let Err(e) = writeln!(self.out, "{}", event) {
            warn!("Failed to write progress line: {}", e);
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ProgressEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short names of every `Deleting` event, in order
    pub fn deleted(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Deleting { shortname, .. } => Some(shortname.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
