// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Send jobs: durable "send text to a session" requests.
//!
//! Status transitions form a DAG and never leave a terminal state:
//!
//! ```text
//! pending ──► running ──► completed
//!    │                └─► failed
//!    └──────► canceled
//! ```

use crate::agent_id::AgentId;
use crate::session::SessionName;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

crate::define_id! {
    /// Opaque, globally unique send job identifier.
    pub struct JobId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled
        )
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Pending, JobStatus::Canceled)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid job transition {from} -> {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Bounds for waiting until a session goes quiet after a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleWait {
    /// Give up waiting after this long.
    pub timeout_ms: u64,
    /// Output must stay unchanged this long to count as idle.
    pub quiet_ms: u64,
}

/// What a job sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPayload {
    pub text: String,
    pub press_enter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_idle: Option<IdleWait>,
}

impl SendPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            press_enter: true,
            wait_idle: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the session went idle after the send (only with an idle wait).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendJob {
    pub id: JobId,
    pub session: SessionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    pub status: JobStatus,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    pub payload: SendPayload,
    #[serde(default)]
    pub result: JobResult,
}

impl SendJob {
    pub fn new(
        id: JobId,
        session: SessionName,
        agent_id: Option<AgentId>,
        payload: SendPayload,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            session,
            agent_id,
            status: JobStatus::Pending,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            payload,
            result: JobResult::default(),
        }
    }

    /// Move to `to`, recording `error` in the result.
    ///
    /// `result.sent` becomes true only on completion.
    pub fn transition(
        &mut self,
        to: JobStatus,
        error: Option<String>,
        now_ms: u64,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at_ms = now_ms;
        self.result.sent = to == JobStatus::Completed;
        if error.is_some() {
            self.result.error = error;
        }
        Ok(())
    }

    /// Cancel if still pending. Returns whether the job was canceled.
    pub fn cancel(&mut self, now_ms: u64) -> bool {
        self.transition(JobStatus::Canceled, None, now_ms).is_ok()
    }

    /// Display label for the target (agent id when known).
    pub fn target_label(&self) -> String {
        match &self.agent_id {
            Some(agent) => format!("{} ({})", agent, self.session),
            None => self.session.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
