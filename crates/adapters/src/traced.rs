// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::session::{SessionAdapter, SessionError};
use async_trait::async_trait;
use sb_core::{SessionInfo, SessionName, SessionState};
use std::time::{Duration, Instant};

/// Wrapper that adds tracing to any SessionAdapter
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn state_for(&self, name: &SessionName) -> Result<SessionState, SessionError> {
        let result = self.inner.state_for(name).await;
        tracing::trace!(session = %name, state = ?result.as_ref().ok(), "checked");
        result
    }

    async fn send_keys(
        &self,
        name: &SessionName,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError> {
        tracing::info_span!("session.send_keys", session = %name)
            .in_scope(|| tracing::debug!(text_len = text.len(), press_enter, "sending"));
        let result = self.inner.send_keys(name, text, press_enter).await;
        if let Err(ref e) = result {
            tracing::error!(session = %name, error = %e, "send_keys failed");
        }
        result
    }

    async fn send_interrupt(&self, name: &SessionName) -> Result<(), SessionError> {
        let result = self.inner.send_interrupt(name).await;
        tracing::info_span!("session.interrupt", session = %name).in_scope(|| match &result {
            Ok(()) => tracing::info!("interrupted"),
            Err(e) => tracing::warn!(error = %e, "interrupt failed"),
        });
        result
    }

    async fn kill(&self, name: &SessionName) -> Result<(), SessionError> {
        let result = self.inner.kill(name).await;
        tracing::info_span!("session.kill", session = %name).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed"),
        });
        result
    }

    async fn capture_pane_tail(
        &self,
        name: &SessionName,
        lines: u32,
    ) -> Result<String, SessionError> {
        let result = self.inner.capture_pane_tail(name, lines).await;
        tracing::info_span!("session.capture", session = %name, lines).in_scope(|| match &result {
            Ok(text) => tracing::debug!(captured_len = text.len(), "captured"),
            Err(e) => tracing::debug!(error = %e, "capture failed"),
        });
        result
    }

    async fn active_sessions_by_activity(
        &self,
        min_idle: Option<Duration>,
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let start = Instant::now();
        let result = self.inner.active_sessions_by_activity(min_idle).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(sessions) => tracing::debug!(count = sessions.len(), elapsed_ms, "listed sessions"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "session listing failed"),
        }
        result
    }

    async fn sessions_with_tags(
        &self,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let result = self.inner.sessions_with_tags(required, optional).await;
        match &result {
            Ok(sessions) => tracing::debug!(?required, count = sessions.len(), "tag query"),
            Err(e) => tracing::error!(?required, error = %e, "tag query failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
