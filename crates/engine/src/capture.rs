// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pane capture with bounded retry, plus the peek report built on it.

use crate::OpError;
use sb_adapters::SessionAdapter;
use sb_core::{detect_needs_input, summarize, Clock, SessionName};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Capture attempts before giving up (at least one is always made).
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(120),
        }
    }
}

/// Outcome of a capture that exhausted or succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Captured(String),
    /// Capture failed and the session no longer exists.
    SessionExited,
}

/// Capture the last `lines` lines, retrying on failure.
///
/// Returns `None` once every attempt has failed.
pub async fn capture_with_retry<S: SessionAdapter>(
    sessions: &S,
    session: &SessionName,
    lines: u32,
    config: &CaptureConfig,
) -> Option<String> {
    let attempts = config.attempts.max(1);
    for attempt in 1..=attempts {
        match sessions.capture_pane_tail(session, lines).await {
            Ok(text) => return Some(text),
            Err(e) => {
                tracing::debug!(%session, attempt, error = %e, "capture attempt failed");
                if attempt < attempts {
                    tokio::time::sleep(config.delay).await;
                }
            }
        }
    }
    None
}

/// Capture, disambiguating exhaustion by re-querying the session.
pub async fn capture<S: SessionAdapter>(
    sessions: &S,
    session: &SessionName,
    lines: u32,
    config: &CaptureConfig,
) -> Result<Capture, OpError> {
    if lines == 0 {
        return Err(OpError::InvalidInput("lines must be positive".to_string()));
    }
    if let Some(text) = capture_with_retry(sessions, session, lines, config).await {
        return Ok(Capture::Captured(text));
    }
    if sessions.state_for(session).await?.exists {
        tracing::warn!(%session, attempts = config.attempts, "capture exhausted");
        Err(OpError::CaptureFailed {
            session: session.to_string(),
        })
    } else {
        Ok(Capture::SessionExited)
    }
}

/// What a peek at a session shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeekReport {
    pub session: SessionName,
    /// True when the session went away while being captured.
    pub session_exited: bool,
    pub content: String,
    pub needs_input: bool,
    pub hint: String,
    pub idle: bool,
    pub summary: String,
}

/// Capture a session and classify its state.
///
/// A session counts as idle once its last activity is at least `idle_after`
/// in the past.
pub async fn peek<S: SessionAdapter, C: Clock>(
    sessions: &S,
    clock: &C,
    session: &SessionName,
    lines: u32,
    idle_after: Duration,
    config: &CaptureConfig,
) -> Result<PeekReport, OpError> {
    let content = match capture(sessions, session, lines, config).await? {
        Capture::Captured(text) => text,
        Capture::SessionExited => {
            return Ok(PeekReport {
                session: session.clone(),
                session_exited: true,
                content: String::new(),
                needs_input: false,
                hint: String::new(),
                idle: false,
                summary: "session exited".to_string(),
            })
        }
    };

    let last_activity = sessions
        .active_sessions_by_activity(None)
        .await?
        .into_iter()
        .find(|s| &s.name == session)
        .and_then(|s| s.last_activity);
    let now_secs = clock.epoch_ms() / 1000;
    let idle = last_activity.is_some_and(|at| now_secs.saturating_sub(at) >= idle_after.as_secs());

    let detection = detect_needs_input(&content);
    Ok(PeekReport {
        session: session.clone(),
        session_exited: false,
        summary: summarize(idle, &detection),
        needs_input: detection.needs_input,
        hint: detection.hint,
        idle,
        content,
    })
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
