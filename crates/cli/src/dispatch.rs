// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached worker dispatch for asynchronous sends.

use sb_core::SendJob;
use sb_engine::Dispatcher;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Re-invokes the running `sb` binary as `sb send --job-id <id> --resume`.
pub struct ProcessDispatcher {
    state_dir: PathBuf,
}

impl ProcessDispatcher {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    fn command(&self, job: &SendJob) -> std::io::Result<Command> {
        let mut cmd = Command::new(std::env::current_exe()?);
        cmd.args(["send", "--job-id", job.id.as_str(), "--resume"])
            .env("SB_STATE_DIR", &self.state_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // Own process group so the caller's terminal signals don't reach it
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        Ok(cmd)
    }
}

impl Dispatcher for ProcessDispatcher {
    fn dispatch(&self, job: &SendJob) -> std::io::Result<()> {
        let child = self.command(job)?.spawn()?;
        tracing::info!(job_id = %job.id, pid = child.id(), "spawned send worker");
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
