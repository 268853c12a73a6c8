// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Send job records, one file per job under `<root>/jobs/`.
//!
//! The job store is shared by every invocation: the one that creates a job,
//! its detached worker, and any later status, cancel or wait call. All
//! mutation goes through [`JobStore::update`], which holds the job's record
//! lock across the read-modify-write.

use crate::file::{is_safe_name, json_records, lock_path, read_json, write_json, RecordLock};
use crate::StorageError;
use sb_core::{JobId, SendJob};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct JobStore {
    dir: PathBuf,
}

impl JobStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            dir: state_dir.join("jobs"),
        }
    }

    /// Persist a freshly created job.
    pub fn create(&self, job: &SendJob) -> Result<(), StorageError> {
        let path = self.path(&job.id)?;
        let _lock = RecordLock::acquire(&path)?;
        write_json(&path, job)
    }

    pub fn get(&self, id: &JobId) -> Result<SendJob, StorageError> {
        read_json(&self.path(id)?)?.ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Apply `f` to the job under its record lock.
    ///
    /// The record is rewritten only if `f` changed it. Returns the job as
    /// stored after the update along with `f`'s result.
    pub fn update<T>(
        &self,
        id: &JobId,
        f: impl FnOnce(&mut SendJob) -> T,
    ) -> Result<(SendJob, T), StorageError> {
        let path = self.path(id)?;
        let _lock = RecordLock::acquire(&path)?;
        let before: SendJob =
            read_json(&path)?.ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let mut job = before.clone();
        let out = f(&mut job);
        if job != before {
            write_json(&path, &job)?;
        }
        Ok((job, out))
    }

    /// All jobs, newest first. Unreadable records are skipped.
    pub fn list(&self) -> Result<Vec<SendJob>, StorageError> {
        let mut jobs = Vec::new();
        for path in json_records(&self.dir)? {
            match read_json::<SendJob>(&path) {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable job"),
            }
        }
        jobs.sort_by(|a, b| {
            b.created_at_ms
                .cmp(&a.created_at_ms)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(jobs)
    }

    /// Delete terminal jobs last updated before `cutoff_ms`.
    ///
    /// Pending and running jobs are never removed.
    pub fn prune(&self, cutoff_ms: u64) -> Result<Vec<JobId>, StorageError> {
        let mut pruned = Vec::new();
        for job in self.list()? {
            if !job.status.is_terminal() || job.updated_at_ms >= cutoff_ms {
                continue;
            }
            let path = self.path(&job.id)?;
            let _lock = RecordLock::acquire(&path)?;
            // Re-check under the lock; the record may have changed since listing.
            match read_json::<SendJob>(&path)? {
                Some(current)
                    if current.status.is_terminal() && current.updated_at_ms < cutoff_ms =>
                {
                    fs::remove_file(&path)?;
                    fs::remove_file(lock_path(&path))?;
                    pruned.push(job.id);
                }
                _ => {}
            }
        }
        Ok(pruned)
    }

    fn path(&self, id: &JobId) -> Result<PathBuf, StorageError> {
        if !is_safe_name(id.as_str()) {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
