// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session directory adapters: live queries and key injection against a
//! terminal multiplexer.

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use sb_core::{SessionInfo, SessionName, SessionState};
use std::time::Duration;
use thiserror::Error;

/// Errors from multiplexer calls.
///
/// An empty or negative answer (no sessions, `exists=false`) is never an
/// error; `CommandFailed` means the multiplexer could not be asked.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("multiplexer command failed: {0}")]
    CommandFailed(String),
}

/// Live view of, and control over, multiplexer sessions.
///
/// Implementations must not cache: every call reflects the multiplexer's
/// state at the time of the call.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Whether the session exists and still has a live pane.
    async fn state_for(&self, name: &SessionName) -> Result<SessionState, SessionError>;

    /// Type `text` literally into the session, optionally followed by Enter.
    async fn send_keys(
        &self,
        name: &SessionName,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError>;

    /// Send an interrupt (Ctrl-C) to the session's pane.
    async fn send_interrupt(&self, name: &SessionName) -> Result<(), SessionError>;

    /// Destroy the session.
    async fn kill(&self, name: &SessionName) -> Result<(), SessionError>;

    /// Capture the last `lines` lines of the session's pane.
    async fn capture_pane_tail(&self, name: &SessionName, lines: u32)
        -> Result<String, SessionError>;

    /// Sessions ordered most-recently-active first.
    ///
    /// With `min_idle`, only sessions inactive for at least that long are
    /// returned.
    async fn active_sessions_by_activity(
        &self,
        min_idle: Option<Duration>,
    ) -> Result<Vec<SessionInfo>, SessionError>;

    /// Sessions carrying a non-empty value for every `required` tag.
    ///
    /// Returned rows include the `required` and `optional` tag values.
    async fn sessions_with_tags(
        &self,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Vec<SessionInfo>, SessionError>;
}
