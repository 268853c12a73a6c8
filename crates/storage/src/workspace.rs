// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace metadata store.

use crate::file::{is_safe_name, json_records, read_json, write_json, RecordLock};
use crate::StorageError;
use sb_core::{WorkspaceId, WorkspaceRecord};
use std::path::{Path, PathBuf};

/// Access to workspace records owned outside this crate.
pub trait WorkspaceStore {
    /// Every workspace record, ordered by id.
    fn list(&self) -> Result<Vec<WorkspaceRecord>, StorageError>;

    /// Atomically load, mutate and save one record.
    ///
    /// `mutate` returns whether it changed the record; nothing is written
    /// when it returns false. Returns that flag.
    fn update<F>(&self, id: &WorkspaceId, mutate: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut WorkspaceRecord) -> bool;
}

/// Workspace records stored as `<root>/workspaces/<id>.json`.
#[derive(Debug, Clone)]
pub struct FileWorkspaceStore {
    dir: PathBuf,
}

impl FileWorkspaceStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            dir: state_dir.join("workspaces"),
        }
    }

    /// Write a record as-is, replacing any existing one.
    pub fn save(&self, record: &WorkspaceRecord) -> Result<(), StorageError> {
        let path = self.path(&record.id)?;
        let _lock = RecordLock::acquire(&path)?;
        write_json(&path, record)
    }

    pub fn get(&self, id: &WorkspaceId) -> Result<WorkspaceRecord, StorageError> {
        read_json(&self.path(id)?)?.ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn path(&self, id: &WorkspaceId) -> Result<PathBuf, StorageError> {
        if !is_safe_name(id.as_str()) {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl WorkspaceStore for FileWorkspaceStore {
    fn list(&self) -> Result<Vec<WorkspaceRecord>, StorageError> {
        let mut records = Vec::new();
        for path in json_records(&self.dir)? {
            if let Some(record) = read_json(&path)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn update<F>(&self, id: &WorkspaceId, mutate: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut WorkspaceRecord) -> bool,
    {
        let path = self.path(id)?;
        let _lock = RecordLock::acquire(&path)?;
        let mut record: WorkspaceRecord =
            read_json(&path)?.ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        if !mutate(&mut record) {
            return Ok(false);
        }
        record.version += 1;
        write_json(&path, &record)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
