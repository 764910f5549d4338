// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot records as returned by `pool.snapshot.query`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SnapError;

/// One entry of a snapshot query result
///
/// `properties` is kept raw: only records that pass the prefix filter ever
/// have their creation timestamp parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    /// Full name, `dataset@shortname`
    pub name: String,
    /// Opaque identifier used for deletion
    pub id: String,
    #[serde(default)]
    pub properties: Value,
}

impl SnapshotRecord {
    /// Part of the name after the first `@`
    pub fn shortname(&self) -> Result<&str, SnapError> {
        self.name
            .split_once('@')
            .map(|(_, short)| short)
            .ok_or_else(|| SnapError::Query(format!("snapshot name {:?} has no '@'", self.name)))
    }

    /// Creation time from `properties.creation.rawvalue`
    pub fn created_at(&self) -> Result<i64, SnapError> {
        let raw = self
            .properties
            .get("creation")
            .and_then(|c| c.get("rawvalue"))
            .ok_or_else(|| {
                SnapError::Query(format!("snapshot {} has no creation property", self.name))
            })?;

        let text = match raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };

        text.trim().parse::<i64>().map_err(|_| SnapError::Parse {
            snapshot: self.name.clone(),
            value: text,
        })
    }
}

/// A snapshot that passed the prefix filter, with derived fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSnapshot {
    pub id: String,
    pub shortname: String,
    pub created_at: i64,
}

/// Outcome of the selection step: newest first in both halves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    pub retained: Vec<RankedSnapshot>,
    pub doomed: Vec<RankedSnapshot>,
}

impl RetentionPlan {
    pub fn matching(&self) -> usize {
        self.retained.len() + self.doomed.len()
    }
}
