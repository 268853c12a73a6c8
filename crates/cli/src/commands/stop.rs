// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sb stop`

use super::{positive, Context};
use crate::output::{failure, respond};
use clap::Args;
use sb_engine::{
    resolve_session, stop_all, stop_and_sync, OpError, Response, StopMode, StoppedSession, Target,
};
use serde::Serialize;
use std::time::Duration;

#[derive(Args)]
pub struct StopArgs {
    /// Session name to stop
    #[arg(long)]
    pub session: Option<String>,

    /// Agent to stop, as <workspace>:<tab>
    #[arg(long)]
    pub agent: Option<String>,

    /// Stop every agent session (requires --yes)
    #[arg(long)]
    pub all: bool,

    /// Kill immediately instead of interrupting first
    #[arg(long)]
    pub force: bool,

    /// How long to wait after the interrupt before killing
    #[arg(long, default_value_t = 3_000)]
    pub grace_ms: u64,

    /// Confirm stopping all sessions
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Replay the first response for repeated calls with this key
    #[arg(long)]
    pub idempotency_key: Option<String>,
}

#[derive(Serialize)]
struct Stopped {
    stopped: Vec<StoppedSession>,
}

pub async fn handle(args: StopArgs, ctx: &Context) -> Response {
    let key = args.idempotency_key.clone();
    let run = ctx
        .idempotency()
        .run("stop", key.as_deref(), move || async move {
            let result = stop(args, ctx).await.map(|stopped| Stopped { stopped });
            respond(ctx.format, result, render)
        })
        .await;
    run.unwrap_or_else(|e| failure(ctx.format, &e))
}

async fn stop(args: StopArgs, ctx: &Context) -> Result<Vec<StoppedSession>, OpError> {
    let target = Target::from_selectors(args.session.as_deref(), args.agent.as_deref(), args.all)?;
    let mode = if args.force {
        StopMode::Force
    } else {
        StopMode::Graceful {
            grace: Duration::from_millis(positive("--grace-ms", args.grace_ms)?),
        }
    };
    let config = sb_engine::env::stop_config();
    let workspaces = ctx.workspaces();

    if target == Target::All {
        return stop_all(&ctx.sessions, &workspaces, mode, &config, args.yes).await;
    }
    let resolved = resolve_session(&ctx.sessions, &target).await?;
    let outcome = stop_and_sync(&ctx.sessions, &workspaces, &resolved.session, mode, &config).await?;
    Ok(vec![StoppedSession {
        session: resolved.session,
        agent_id: resolved.agent_id,
        outcome,
    }])
}

fn render(result: &Stopped) -> String {
    if result.stopped.is_empty() {
        return "No agent sessions to stop\n".to_string();
    }
    result
        .stopped
        .iter()
        .map(|s| match &s.agent_id {
            Some(agent) => format!("Stopped {} ({})\n", agent, s.session),
            None => format!("Stopped {}\n", s.session),
        })
        .collect()
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
