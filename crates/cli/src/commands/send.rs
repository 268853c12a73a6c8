// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sb send`

use super::{positive, Context};
use crate::output::respond;
use clap::Args;
use sb_core::{IdleWait, JobId, JobStatus, SendJob, SendPayload};
use sb_engine::{resolve_session, OpError, Response, SendMode, Target};

#[derive(Args)]
pub struct SendArgs {
    /// Target session name
    #[arg(long)]
    pub session: Option<String>,

    /// Target agent as <workspace>:<tab>
    #[arg(long)]
    pub agent: Option<String>,

    /// Type the text without pressing Enter
    #[arg(long)]
    pub no_enter: bool,

    /// Return immediately; a detached worker performs the send
    #[arg(long = "async")]
    pub detach: bool,

    /// After sending, wait for the session's output to settle
    #[arg(long)]
    pub wait_idle: bool,

    /// Give up waiting for idle after this many milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub idle_timeout_ms: u64,

    /// Output must stay unchanged this long to count as idle
    #[arg(long, default_value_t = 2_000)]
    pub idle_quiet_ms: u64,

    /// Replay the first response for repeated calls with this key
    #[arg(long)]
    pub idempotency_key: Option<String>,

    /// Existing job to execute (used by detached workers)
    #[arg(long, requires = "resume")]
    pub job_id: Option<String>,

    /// Execute the job given by --job-id inline
    #[arg(long, requires = "job_id", hide = true)]
    pub resume: bool,

    /// Text to send
    pub text: Option<String>,
}

pub async fn handle(args: SendArgs, ctx: &Context) -> Response {
    if args.resume {
        let id = JobId::new(args.job_id.unwrap_or_default());
        return respond(ctx.format, resume(&id, ctx).await, render_job);
    }

    let key = args.idempotency_key.clone();
    let run = ctx
        .idempotency()
        .run("send", key.as_deref(), move || async move {
            respond(ctx.format, send(args, ctx).await, render_job)
        })
        .await;
    run.unwrap_or_else(|e| crate::output::failure(ctx.format, &e))
}

async fn send(args: SendArgs, ctx: &Context) -> Result<SendJob, OpError> {
    let target = Target::from_selectors(args.session.as_deref(), args.agent.as_deref(), false)?;
    let text = args
        .text
        .ok_or_else(|| OpError::InvalidInput("text to send is required".to_string()))?;
    let wait_idle = if args.wait_idle {
        Some(IdleWait {
            timeout_ms: positive("--idle-timeout-ms", args.idle_timeout_ms)?,
            quiet_ms: positive("--idle-quiet-ms", args.idle_quiet_ms)?,
        })
    } else {
        None
    };

    let resolved = resolve_session(&ctx.sessions, &target).await?;
    let payload = SendPayload {
        text,
        press_enter: !args.no_enter,
        wait_idle,
    };
    let mode = if args.detach {
        SendMode::Async
    } else {
        SendMode::Sync
    };
    ctx.queue().send(&resolved, payload, mode).await
}

async fn resume(id: &JobId, ctx: &Context) -> Result<SendJob, OpError> {
    let job = ctx.queue().resume(id).await?;
    match job.status {
        JobStatus::Failed => Err(OpError::JobFailed { job: Box::new(job) }),
        _ => Ok(job),
    }
}

pub fn render_job(job: &SendJob) -> String {
    let target = job.target_label();
    let mut out = match job.status {
        JobStatus::Pending => format!("Queued job {} for {}\n", job.id, target),
        JobStatus::Completed => format!("Sent to {} (job {})\n", target, job.id),
        status => format!("Job {} is {} ({})\n", job.id, status, target),
    };
    if let Some(idle) = job.result.idle {
        out.push_str(if idle { "Session is idle\n" } else { "Session did not go idle\n" });
    }
    out
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
