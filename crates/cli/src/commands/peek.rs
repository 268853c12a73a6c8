// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sb peek`

use super::{positive, Context};
use crate::output::respond;
use clap::Args;
use sb_core::SystemClock;
use sb_engine::{peek, resolve_session, OpError, PeekReport, Response, Target};
use std::time::Duration;

/// Inactivity after which a session counts as idle.
const IDLE_AFTER: Duration = Duration::from_secs(5);

#[derive(Args)]
pub struct PeekArgs {
    /// Session name to capture
    #[arg(long)]
    pub session: Option<String>,

    /// Agent to capture, as <workspace>:<tab>
    #[arg(long)]
    pub agent: Option<String>,

    /// Number of trailing pane lines to capture
    #[arg(long, short = 'n', default_value_t = 40)]
    pub lines: u64,
}

pub async fn handle(args: PeekArgs, ctx: &Context) -> Response {
    respond(ctx.format, run(args, ctx).await, render)
}

async fn run(args: PeekArgs, ctx: &Context) -> Result<PeekReport, OpError> {
    let target = Target::from_selectors(args.session.as_deref(), args.agent.as_deref(), false)?;
    let lines = u32::try_from(positive("--lines", args.lines)?)
        .map_err(|_| OpError::InvalidInput("--lines is too large".to_string()))?;
    let resolved = resolve_session(&ctx.sessions, &target).await?;
    peek(
        &ctx.sessions,
        &SystemClock,
        &resolved.session,
        lines,
        IDLE_AFTER,
        &sb_engine::env::capture_config(),
    )
    .await
}

fn render(report: &PeekReport) -> String {
    if report.session_exited {
        return format!("Session {} exited\n", report.session);
    }
    let mut out = format!("╭────── peek: {} ──────\n", report.session);
    out.push_str(report.content.trim_end_matches('\n'));
    out.push('\n');
    out.push_str(&format!("╰────── {} ──────\n", report.summary));
    out
}

#[cfg(test)]
#[path = "peek_tests.rs"]
mod tests;
