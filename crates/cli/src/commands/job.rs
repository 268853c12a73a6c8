// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sb job`

use super::{positive, Context};
use crate::output::{failure, respond};
use clap::{Args, Subcommand};
use sb_core::{JobId, SendJob};
use sb_engine::{OpError, Response};
use serde::Serialize;
use std::time::Duration;

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Show a job
    Status {
        /// Job ID
        id: String,
    },
    /// Cancel a job that has not started yet
    Cancel {
        /// Job ID
        id: String,
        /// Replay the first response for repeated calls with this key
        #[arg(long)]
        idempotency_key: Option<String>,
    },
    /// Block until a job finishes
    Wait {
        /// Job ID
        id: String,
        /// Give up after this many milliseconds
        #[arg(long, default_value_t = 60_000)]
        timeout_ms: u64,
        /// Poll interval in milliseconds (default: SB_JOB_POLL_MS or 250)
        #[arg(long)]
        poll_ms: Option<u64>,
    },
    /// List jobs, newest first
    List,
    /// Delete finished jobs past the retention window
    Prune,
}

#[derive(Serialize)]
struct Cancellation {
    job: SendJob,
    canceled: bool,
}

#[derive(Serialize)]
struct Pruned {
    pruned: Vec<JobId>,
}

pub async fn handle(command: JobCommand, ctx: &Context) -> Response {
    let format = ctx.format;
    let queue = ctx.queue();
    match command {
        JobCommand::Status { id } => respond(format, queue.get(&JobId::new(id)), render_status),
        JobCommand::Cancel {
            id,
            idempotency_key,
        } => {
            let queue = &queue;
            let run = ctx
                .idempotency()
                .run("job-cancel", idempotency_key.as_deref(), move || async move {
                    let result = queue
                        .cancel(&JobId::new(id))
                        .map(|(job, canceled)| Cancellation { job, canceled });
                    respond(format, result, render_cancel)
                })
                .await;
            run.unwrap_or_else(|e| failure(format, &e))
        }
        JobCommand::Wait {
            id,
            timeout_ms,
            poll_ms,
        } => {
            let result = wait(ctx, &JobId::new(id), timeout_ms, poll_ms).await;
            respond(format, result, |job| {
                format!("Job {} completed ({})\n", job.id, job.target_label())
            })
        }
        JobCommand::List => respond(format, queue.list(), |jobs| {
            if jobs.is_empty() {
                return "No jobs\n".to_string();
            }
            jobs.iter().map(render_status).collect()
        }),
        JobCommand::Prune => respond(
            format,
            queue.prune().map(|pruned| Pruned { pruned }),
            |p| format!("Pruned {} job(s)\n", p.pruned.len()),
        ),
    }
}

async fn wait(
    ctx: &Context,
    id: &JobId,
    timeout_ms: u64,
    poll_ms: Option<u64>,
) -> Result<SendJob, OpError> {
    let timeout = Duration::from_millis(positive("--timeout-ms", timeout_ms)?);
    let poll = match poll_ms {
        Some(ms) => Duration::from_millis(positive("--poll-ms", ms)?),
        None => sb_engine::env::queue_config().poll_interval,
    };
    let queue = ctx.queue();
    tokio::select! {
        result = queue.wait(id, timeout, poll) => result,
        _ = tokio::signal::ctrl_c() => Err(OpError::Transient(format!("interrupted while waiting for job {id}"))),
    }
}

fn render_status(job: &SendJob) -> String {
    let mut out = format!("{}  {:<9}  {}\n", job.id, job.status, job.target_label());
    if let Some(error) = &job.result.error {
        out.push_str(&format!("  error: {}\n", error));
    }
    out
}

fn render_cancel(c: &Cancellation) -> String {
    if c.canceled {
        format!("Canceled job {}\n", c.job.id)
    } else {
        format!("Job {} is {}; not canceled\n", c.job.id, c.job.status)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
