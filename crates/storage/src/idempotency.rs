// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-once replay records keyed by (command, idempotency key).

use crate::file::{read_json, write_json, RecordLock};
use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// The terminal response of a command, as first recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub command: String,
    pub exit_code: i32,
    /// Rendered output, replayed byte for byte.
    pub body: String,
    pub recorded_at: DateTime<Utc>,
}

/// File-backed idempotency records under `<root>/idempotency/`.
#[derive(Debug, Clone)]
pub struct IdempotencyStore {
    dir: PathBuf,
}

impl IdempotencyStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            dir: state_dir.join("idempotency"),
        }
    }

    /// Stored response for (command, key), if one was recorded.
    pub fn lookup(&self, command: &str, key: &str) -> Result<Option<StoredResponse>, StorageError> {
        read_json(&self.path(command, key))
    }

    /// Record a response unless one already exists.
    ///
    /// First writer wins: when another invocation recorded first, its
    /// response is returned and `exit_code`/`body` are discarded.
    pub fn record(
        &self,
        command: &str,
        key: &str,
        exit_code: i32,
        body: &str,
    ) -> Result<StoredResponse, StorageError> {
        let path = self.path(command, key);
        let _lock = RecordLock::acquire(&path)?;
        if let Some(existing) = read_json::<StoredResponse>(&path)? {
            tracing::debug!(command, "idempotency record already present, keeping first");
            return Ok(existing);
        }
        let response = StoredResponse {
            command: command.to_string(),
            exit_code,
            body: body.to_string(),
            recorded_at: Utc::now(),
        };
        write_json(&path, &response)?;
        Ok(response)
    }

    fn path(&self, command: &str, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record_name(command, key)))
    }
}

/// Hex SHA-256 of the command and key, so any caller key is a safe file name.
fn record_name(command: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(command.as_bytes());
    hasher.update([0u8]);
    hasher.update(key.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
#[path = "idempotency_tests.rs"]
mod tests;
