// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session termination: single graceful/forced stop and batch stop-all.

use crate::poll::{Poller, Tick};
use crate::registry::remove_session_tabs;
use crate::OpError;
use sb_adapters::{SessionAdapter, SessionError};
use sb_core::{tags, AgentId, SessionInfo, SessionName, SessionType};
use sb_storage::WorkspaceStore;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopConfig {
    /// Liveness poll interval during the grace period.
    pub poll_interval: Duration,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// How to stop a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Kill immediately.
    Force,
    /// Interrupt, wait up to the grace period, then kill.
    Graceful { grace: Duration },
}

/// How a session ended up stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// Exited on its own after the interrupt.
    Exited,
    Killed,
    /// Was already gone when the kill landed.
    AlreadyGone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoppedSession {
    pub session: SessionName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    pub outcome: StopOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopFailure {
    pub session: SessionName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    pub error: String,
}

/// Stop one session.
pub async fn stop_session<S: SessionAdapter>(
    sessions: &S,
    session: &SessionName,
    mode: StopMode,
    config: &StopConfig,
) -> Result<StopOutcome, OpError> {
    let grace = match mode {
        StopMode::Force => return kill(sessions, session).await,
        StopMode::Graceful { grace } => grace,
    };

    if let Err(e) = sessions.send_interrupt(session).await {
        tracing::warn!(%session, error = %e, "interrupt failed, killing");
        return kill(sessions, session).await;
    }

    let mut poller = Poller::new(config.poll_interval, Some(grace));
    while poller.tick().await == Tick::Ready {
        match sessions.state_for(session).await {
            Ok(state) if !state.exists => {
                tracing::info!(%session, "session exited after interrupt");
                return Ok(StopOutcome::Exited);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(%session, error = %e, "liveness check failed"),
        }
    }

    // Re-query after the wait; the session may have exited on the last tick.
    if let Ok(state) = sessions.state_for(session).await {
        if !state.exists {
            return Ok(StopOutcome::Exited);
        }
    }
    tracing::info!(%session, grace_ms = grace.as_millis() as u64, "grace period elapsed");
    kill(sessions, session).await
}

async fn kill<S: SessionAdapter>(
    sessions: &S,
    session: &SessionName,
) -> Result<StopOutcome, OpError> {
    match sessions.kill(session).await {
        Ok(()) => Ok(StopOutcome::Killed),
        Err(SessionError::NotFound(_)) => Ok(StopOutcome::AlreadyGone),
        Err(e) => Err(e.into()),
    }
}

/// Stop one session and drop its tabs from the workspace registry.
pub async fn stop_and_sync<S: SessionAdapter, W: WorkspaceStore>(
    sessions: &S,
    workspaces: &W,
    session: &SessionName,
    mode: StopMode,
    config: &StopConfig,
) -> Result<StopOutcome, OpError> {
    let outcome = stop_session(sessions, session, mode, config).await?;
    if let Err(e) = remove_session_tabs(workspaces, session) {
        tracing::warn!(%session, error = %e, "tab registry sync failed");
    }
    Ok(outcome)
}

/// Find every agent session eligible for stop-all.
///
/// Merges the activity listing with a tag query for managed sessions whose
/// type is `agent` or missing. Activity fields win; tag fields fill gaps.
/// Activity order is kept, with tag-only sessions appended by name.
pub async fn discover_agent_sessions<S: SessionAdapter>(
    sessions: &S,
) -> Result<Vec<SessionInfo>, OpError> {
    let active = sessions.active_sessions_by_activity(None).await?;
    let tagged = sessions
        .sessions_with_tags(&[tags::MANAGED], &[tags::WORKSPACE, tags::TAB, tags::TYPE])
        .await?;

    let mut merged: Vec<SessionInfo> = active;
    let mut index: HashMap<SessionName, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), i))
        .collect();

    for info in tagged {
        if !info.is_managed() || !matches!(info.session_type(), Some(SessionType::Agent) | None) {
            continue;
        }
        match index.get(&info.name) {
            Some(&i) => merged[i].merge_missing(&info),
            None => {
                index.insert(info.name.clone(), merged.len());
                merged.push(info);
            }
        }
    }

    merged.retain(is_stoppable_agent);
    Ok(merged)
}

/// Agent-typed sessions, plus managed sessions with no type tag.
fn is_stoppable_agent(info: &SessionInfo) -> bool {
    match info.session_type() {
        Some(SessionType::Agent) => true,
        Some(SessionType::Shell) => false,
        None => info.is_managed(),
    }
}

fn agent_id_of(info: &SessionInfo) -> Option<AgentId> {
    Some(AgentId::new(info.workspace_id()?, info.tab_id()?))
}

/// Stop every discovered agent session.
///
/// Requires `confirmed`. Each session is stopped independently; failures are
/// collected and the batch continues. Any failure alongside at least one
/// success is a partial failure.
pub async fn stop_all<S: SessionAdapter, W: WorkspaceStore>(
    sessions: &S,
    workspaces: &W,
    mode: StopMode,
    config: &StopConfig,
    confirmed: bool,
) -> Result<Vec<StoppedSession>, OpError> {
    if !confirmed {
        return Err(OpError::ConfirmationRequired(
            "stopping all agent sessions requires --yes".to_string(),
        ));
    }

    let targets = discover_agent_sessions(sessions).await?;
    tracing::info!(count = targets.len(), "stopping all agent sessions");

    let mut stopped = Vec::new();
    let mut failures = Vec::new();
    for info in targets {
        let agent_id = agent_id_of(&info);
        match stop_and_sync(sessions, workspaces, &info.name, mode, config).await {
            Ok(outcome) => stopped.push(StoppedSession {
                session: info.name,
                agent_id,
                outcome,
            }),
            Err(e) => {
                tracing::warn!(session = %info.name, error = %e, "stop failed");
                failures.push(StopFailure {
                    session: info.name,
                    agent_id,
                    error: e.to_string(),
                });
            }
        }
    }

    match (stopped.is_empty(), failures.is_empty()) {
        (_, true) => Ok(stopped),
        (true, false) => Err(OpError::BatchFailed { failures }),
        (false, false) => Err(OpError::PartialFailure { stopped, failures }),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
