// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation outcomes surfaced to command handlers.

use crate::lifecycle::{StopFailure, StoppedSession};
use sb_adapters::SessionError;
use sb_core::{JobId, JobStatus, SendJob};
use sb_storage::StorageError;
use thiserror::Error;

/// Exit status classification. The command boundary maps each class to a
/// process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Failure,
    InvalidInput,
    NotFound,
    ConfirmationRequired,
    PartialFailure,
    Timeout,
    Transient,
}

/// Errors returned by engine operations
#[derive(Debug, Error)]
pub enum OpError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("confirmation required: {0}")]
    ConfirmationRequired(String),
    #[error("capture failed: session {session} still exists but its pane could not be read")]
    CaptureFailed { session: String },
    #[error("{0}")]
    Transient(String),
    #[error("stopped {} session(s), {} failed", .stopped.len(), .failures.len())]
    PartialFailure {
        stopped: Vec<StoppedSession>,
        failures: Vec<StopFailure>,
    },
    #[error("failed to stop {} session(s)", .failures.len())]
    BatchFailed { failures: Vec<StopFailure> },
    #[error("timed out waiting for job {job_id} (last status: {last_status})")]
    Timeout { job_id: JobId, last_status: JobStatus },
    #[error("job {} failed: {}", .job.id, .job.result.error.as_deref().unwrap_or("unknown error"))]
    JobFailed { job: Box<SendJob> },
    #[error("job {} was canceled", .job.id)]
    JobCanceled { job: Box<SendJob> },
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl OpError {
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        OpError::NotFound {
            what,
            id: id.into(),
        }
    }

    /// Stable snake_case code for structured output.
    pub fn kind(&self) -> &'static str {
        match self {
            OpError::NotFound { .. } => "not_found",
            OpError::InvalidInput(_) => "invalid_input",
            OpError::ConfirmationRequired(_) => "confirmation_required",
            OpError::CaptureFailed { .. } => "capture_failed",
            OpError::Transient(_) => "transient",
            OpError::PartialFailure { .. } => "partial_failure",
            OpError::BatchFailed { .. } => "batch_failed",
            OpError::Timeout { .. } => "timeout",
            OpError::JobFailed { .. } => "job_failed",
            OpError::JobCanceled { .. } => "job_canceled",
            OpError::Storage(_) => "storage",
        }
    }

    pub fn exit_class(&self) -> ExitClass {
        match self {
            OpError::NotFound { .. } | OpError::CaptureFailed { .. } => ExitClass::NotFound,
            OpError::InvalidInput(_) => ExitClass::InvalidInput,
            OpError::ConfirmationRequired(_) => ExitClass::ConfirmationRequired,
            OpError::Transient(_) => ExitClass::Transient,
            OpError::PartialFailure { .. } => ExitClass::PartialFailure,
            OpError::Timeout { .. } => ExitClass::Timeout,
            OpError::BatchFailed { .. }
            | OpError::JobFailed { .. }
            | OpError::JobCanceled { .. }
            | OpError::Storage(_) => ExitClass::Failure,
        }
    }

    /// Whether this outcome may be persisted for idempotent replay.
    ///
    /// Confirmation rejections and transient failures are never cached, so
    /// a retry with the same key executes again.
    pub fn cacheable(&self) -> bool {
        !matches!(
            self,
            OpError::ConfirmationRequired(_) | OpError::Transient(_)
        )
    }
}

impl From<SessionError> for OpError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(name) => OpError::not_found("session", name),
            SessionError::CommandFailed(msg) => OpError::Transient(msg),
        }
    }
}

impl From<StorageError> for OpError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => OpError::not_found("record", id),
            other => OpError::Storage(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
