// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod job;
pub mod peek;
pub mod send;
pub mod stop;

use crate::dispatch::ProcessDispatcher;
use crate::output::OutputFormat;
use sb_adapters::{TmuxAdapter, TracedSession};
use sb_core::{SystemClock, UuidIdGen};
use sb_engine::{Idempotency, SendQueue};
use sb_storage::{FileWorkspaceStore, IdempotencyStore, JobStore};
use std::path::PathBuf;

pub type Sessions = TracedSession<TmuxAdapter>;
pub type Queue = SendQueue<Sessions, SystemClock, UuidIdGen, ProcessDispatcher>;

/// Everything a command handler needs.
pub struct Context {
    pub state_dir: PathBuf,
    pub format: OutputFormat,
    pub sessions: Sessions,
}

impl Context {
    pub fn new(state_dir: PathBuf, format: OutputFormat) -> Self {
        Self {
            state_dir,
            format,
            sessions: TracedSession::new(TmuxAdapter::new()),
        }
    }

    pub fn idempotency(&self) -> Idempotency {
        Idempotency::new(IdempotencyStore::new(&self.state_dir))
    }

    pub fn queue(&self) -> Queue {
        SendQueue::new(
            self.sessions.clone(),
            JobStore::new(&self.state_dir),
            SystemClock,
            UuidIdGen::default(),
            ProcessDispatcher::new(self.state_dir.clone()),
        )
        .with_config(sb_engine::env::queue_config())
    }

    pub fn workspaces(&self) -> FileWorkspaceStore {
        FileWorkspaceStore::new(&self.state_dir)
    }
}

/// Reject a zero duration or count supplied on the command line.
pub fn positive(name: &str, value: u64) -> Result<u64, sb_engine::OpError> {
    if value == 0 {
        Err(sb_engine::OpError::InvalidInput(format!(
            "{name} must be positive"
        )))
    } else {
        Ok(value)
    }
}
