// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Send job queue.
//!
//! A job is created `pending`. Exactly one executor claims it by moving it to
//! `running` under the job's record lock; only the claimant performs the
//! send and the terminal transition. Asynchronous sends hand the job id to a
//! [`Dispatcher`], which starts a detached worker that later resumes it.

use crate::capture::{capture, Capture, CaptureConfig};
use crate::poll::{Poller, Tick};
use crate::resolve::ResolvedSession;
use crate::OpError;
use sb_adapters::SessionAdapter;
use sb_core::{Clock, IdGen, IdleWait, JobId, JobStatus, SendJob, SendPayload, SessionName};
use sb_storage::{JobStore, StorageError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Default poll interval for `wait`.
    pub poll_interval: Duration,
    /// Terminal jobs older than this are pruned.
    pub retention: Duration,
    /// Poll interval while waiting for a session to go idle.
    pub idle_poll: Duration,
    /// Lines compared when waiting for idle.
    pub idle_lines: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            retention: Duration::from_secs(7 * 24 * 60 * 60),
            idle_poll: Duration::from_millis(500),
            idle_lines: 200,
        }
    }
}

/// Starts a detached worker that will resume a job.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, job: &SendJob) -> std::io::Result<()>;
}

/// How a send request executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Send inline and return the terminal job.
    Sync,
    /// Dispatch a worker and return the pending job.
    Async,
}

pub struct SendQueue<S, C, I, D> {
    sessions: S,
    store: JobStore,
    clock: C,
    ids: I,
    dispatcher: D,
    config: QueueConfig,
}

impl<S, C, I, D> SendQueue<S, C, I, D>
where
    S: SessionAdapter,
    C: Clock,
    I: IdGen,
    D: Dispatcher,
{
    pub fn new(sessions: S, store: JobStore, clock: C, ids: I, dispatcher: D) -> Self {
        Self {
            sessions,
            store,
            clock,
            ids,
            dispatcher,
            config: QueueConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    /// Create a pending job, pruning expired terminal jobs first.
    pub fn create(&self, target: &ResolvedSession, payload: SendPayload) -> Result<SendJob, OpError> {
        if let Err(e) = self.prune() {
            tracing::warn!(error = %e, "job pruning failed");
        }
        let job = SendJob::new(
            JobId::new(self.ids.next()),
            target.session.clone(),
            target.agent_id.clone(),
            payload,
            self.clock.epoch_ms(),
        );
        self.store.create(&job)?;
        tracing::info!(job_id = %job.id, session = %job.session, "job created");
        Ok(job)
    }

    pub fn get(&self, id: &JobId) -> Result<SendJob, OpError> {
        self.store.get(id).map_err(|e| job_error(id, e))
    }

    /// All jobs, newest first.
    pub fn list(&self) -> Result<Vec<SendJob>, OpError> {
        Ok(self.store.list()?)
    }

    /// Delete terminal jobs past the retention window.
    pub fn prune(&self) -> Result<Vec<JobId>, OpError> {
        let retention_ms = self.config.retention.as_millis() as u64;
        let cutoff = self.clock.epoch_ms().saturating_sub(retention_ms);
        let pruned = self.store.prune(cutoff)?;
        if !pruned.is_empty() {
            tracing::info!(count = pruned.len(), "pruned expired jobs");
        }
        Ok(pruned)
    }

    /// Move a job along the status DAG.
    pub fn set_status(
        &self,
        id: &JobId,
        status: JobStatus,
        error: Option<String>,
    ) -> Result<SendJob, OpError> {
        let now = self.clock.epoch_ms();
        let (job, moved) = self
            .store
            .update(id, |job| job.transition(status, error, now))
            .map_err(|e| job_error(id, e))?;
        moved.map_err(|e| OpError::InvalidInput(format!("job {id}: {e}")))?;
        Ok(job)
    }

    /// Cancel a pending job.
    ///
    /// Returns the job and whether this call canceled it. A job that is
    /// already running or terminal is returned unchanged.
    pub fn cancel(&self, id: &JobId) -> Result<(SendJob, bool), OpError> {
        let now = self.clock.epoch_ms();
        let (job, canceled) = self
            .store
            .update(id, |job| job.cancel(now))
            .map_err(|e| job_error(id, e))?;
        if canceled {
            tracing::info!(job_id = %id, "job canceled");
        }
        Ok((job, canceled))
    }

    /// Poll until the job is terminal or `timeout` elapses.
    pub async fn wait(
        &self,
        id: &JobId,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<SendJob, OpError> {
        let mut poller = Poller::new(poll_interval, Some(timeout));
        loop {
            let job = self.get(id)?;
            match job.status {
                JobStatus::Completed => return Ok(job),
                JobStatus::Failed => return Err(OpError::JobFailed { job: Box::new(job) }),
                JobStatus::Canceled => return Err(OpError::JobCanceled { job: Box::new(job) }),
                JobStatus::Pending | JobStatus::Running => {}
            }
            if poller.tick().await == Tick::Timeout {
                let last = self.get(id)?;
                if last.status.is_terminal() {
                    continue;
                }
                return Err(OpError::Timeout {
                    job_id: id.clone(),
                    last_status: last.status,
                });
            }
        }
    }

    /// Create a job for `target` and execute it in `mode`.
    ///
    /// Sync returns the terminal job (a failed send is `JobFailed`). Async
    /// returns the still-pending job once a worker has been dispatched.
    pub async fn send(
        &self,
        target: &ResolvedSession,
        payload: SendPayload,
        mode: SendMode,
    ) -> Result<SendJob, OpError> {
        let job = self.create(target, payload)?;
        match mode {
            SendMode::Sync => finished(self.resume(&job.id).await?),
            SendMode::Async => {
                if let Err(e) = self.dispatcher.dispatch(&job) {
                    tracing::error!(job_id = %job.id, error = %e, "worker dispatch failed");
                    let now = self.clock.epoch_ms();
                    let message = format!("dispatch failed: {e}");
                    self.store.update(&job.id, |job| {
                        job.transition(JobStatus::Running, None, now)
                            .and_then(|()| job.transition(JobStatus::Failed, Some(message), now))
                    })?;
                    return Err(OpError::Transient(format!(
                        "could not start worker for job {}: {e}",
                        job.id
                    )));
                }
                tracing::info!(job_id = %job.id, "worker dispatched");
                Ok(job)
            }
        }
    }

    /// Execute a job inline if it is still pending.
    ///
    /// A job that some other executor already claimed (or that was canceled)
    /// is returned as-is without sending anything.
    pub async fn resume(&self, id: &JobId) -> Result<SendJob, OpError> {
        let now = self.clock.epoch_ms();
        let (job, claimed) = self
            .store
            .update(id, |job| job.transition(JobStatus::Running, None, now).is_ok())
            .map_err(|e| job_error(id, e))?;
        if !claimed {
            tracing::info!(job_id = %id, status = %job.status, "job already claimed");
            return Ok(job);
        }

        let (status, error, idle) = match self.execute(&job).await {
            Ok(idle) => (JobStatus::Completed, None, idle),
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "send failed");
                (JobStatus::Failed, Some(e.to_string()), None)
            }
        };
        let now = self.clock.epoch_ms();
        let recorded = self.store.update(id, |job| {
            job.result.idle = idle;
            job.transition(status, error.clone(), now)
        });
        let (job, moved) = recorded.map_err(|e| {
            tracing::error!(
                job_id = %id,
                %status,
                error = ?error,
                idle = ?idle,
                storage_error = %e,
                "job outcome not recorded"
            );
            e
        })?;
        moved.map_err(|e| OpError::InvalidInput(format!("job {id}: {e}")))?;
        tracing::info!(job_id = %id, status = %job.status, "job finished");
        Ok(job)
    }

    /// Send the payload. Returns the idle outcome when an idle wait was asked.
    async fn execute(&self, job: &SendJob) -> Result<Option<bool>, OpError> {
        if !self.sessions.state_for(&job.session).await?.exists {
            return Err(OpError::not_found("session", job.session.to_string()));
        }
        let payload = &job.payload;
        self.sessions
            .send_keys(&job.session, &payload.text, payload.press_enter)
            .await?;
        match payload.wait_idle {
            Some(wait) => Ok(Some(self.wait_for_idle(&job.session, wait).await)),
            None => Ok(None),
        }
    }

    /// Wait until the pane output stays unchanged for the quiet window.
    ///
    /// Returns false when the timeout elapses or the session goes away.
    pub async fn wait_for_idle(&self, session: &SessionName, wait: IdleWait) -> bool {
        let quiet = Duration::from_millis(wait.quiet_ms);
        let single = CaptureConfig {
            attempts: 1,
            delay: Duration::ZERO,
        };
        let mut poller = Poller::new(
            self.config.idle_poll,
            Some(Duration::from_millis(wait.timeout_ms)),
        );
        let mut last: Option<(String, Instant)> = None;
        loop {
            match capture(&self.sessions, session, self.config.idle_lines, &single).await {
                Ok(Capture::Captured(text)) => match &last {
                    Some((prev, since)) if *prev == text => {
                        if since.elapsed() >= quiet {
                            return true;
                        }
                    }
                    _ => last = Some((text, Instant::now())),
                },
                Ok(Capture::SessionExited) => return false,
                Err(e) => tracing::debug!(%session, error = %e, "idle capture failed"),
            }
            if poller.tick().await == Tick::Timeout {
                tracing::info!(%session, timeout_ms = wait.timeout_ms, "session did not go idle");
                return false;
            }
        }
    }
}

/// Map a terminal job to the sync send outcome.
fn finished(job: SendJob) -> Result<SendJob, OpError> {
    match job.status {
        JobStatus::Failed => Err(OpError::JobFailed { job: Box::new(job) }),
        JobStatus::Canceled => Err(OpError::JobCanceled { job: Box::new(job) }),
        _ => Ok(job),
    }
}

fn job_error(id: &JobId, e: StorageError) -> OpError {
    match e {
        StorageError::NotFound(_) => OpError::not_found("job", id.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
