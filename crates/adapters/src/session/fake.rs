// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use sb_core::{SessionInfo, SessionName, SessionState};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Recorded session call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    StateFor {
        name: String,
    },
    SendKeys {
        name: String,
        text: String,
        press_enter: bool,
    },
    SendInterrupt {
        name: String,
    },
    Kill {
        name: String,
    },
    CapturePaneTail {
        name: String,
        lines: u32,
    },
    ActiveByActivity {
        min_idle: Option<Duration>,
    },
    SessionsWithTags {
        required: Vec<String>,
        optional: Vec<String>,
    },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub name: String,
    pub output: Vec<String>,
    pub pane_live: bool,
    pub last_activity: Option<u64>,
    pub tags: BTreeMap<String, String>,
    /// Session disappears on its own at this instant.
    pub exits_at: Option<Instant>,
    /// Session exits this long after receiving an interrupt.
    pub exits_after_interrupt: Option<Duration>,
}

impl FakeSession {
    fn present(&self) -> bool {
        !matches!(self.exits_at, Some(at) if Instant::now() >= at)
    }

    fn info(&self, tag_names: Option<&[&str]>) -> SessionInfo {
        let mut info = SessionInfo::new(self.name.as_str());
        info.last_activity = self.last_activity;
        info.tags = match tag_names {
            None => self.tags.clone(),
            Some(names) => self
                .tags
                .iter()
                .filter(|(k, _)| names.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        info
    }
}

#[derive(Default)]
struct FakeSessionState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    capture_failures: HashMap<String, u32>,
    failing_kills: HashSet<String>,
    failing_interrupts: HashSet<String>,
    failing_sends: HashSet<String>,
    transport_down: bool,
    now_secs: u64,
}

/// Fake session adapter for testing
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                now_secs: 1_700_000_000,
                ..Default::default()
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of kill calls issued for `name`.
    pub fn kill_count(&self, name: &str) -> usize {
        self.count(|c| matches!(c, SessionCall::Kill { name: n } if n == name))
    }

    /// Number of send_keys calls issued for any session.
    pub fn send_count(&self) -> usize {
        self.count(|c| matches!(c, SessionCall::SendKeys { .. }))
    }

    /// Number of capture calls issued for `name`.
    pub fn capture_count(&self, name: &str) -> usize {
        self.count(|c| matches!(c, SessionCall::CapturePaneTail { name: n, .. } if n == name))
    }

    fn count(&self, pred: impl Fn(&SessionCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Add a live session with no tags.
    pub fn add_session(&self, name: &str) {
        self.add_tagged_session(name, &[]);
    }

    /// Add a live session carrying `tags`.
    pub fn add_tagged_session(&self, name: &str, tags: &[(&str, &str)]) {
        self.inner.lock().sessions.insert(
            name.to_string(),
            FakeSession {
                name: name.to_string(),
                output: Vec::new(),
                pane_live: true,
                last_activity: None,
                tags: tags
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                exits_at: None,
                exits_after_interrupt: None,
            },
        );
    }

    /// Remove a session immediately, as if its process exited.
    pub fn remove_session(&self, name: &str) {
        self.inner.lock().sessions.remove(name);
    }

    fn with_session(&self, name: &str, f: impl FnOnce(&mut FakeSession)) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            f(session);
        }
    }

    pub fn set_output(&self, name: &str, output: Vec<String>) {
        self.with_session(name, |s| s.output = output);
    }

    pub fn set_activity(&self, name: &str, epoch_secs: u64) {
        self.with_session(name, |s| s.last_activity = Some(epoch_secs));
    }

    pub fn set_pane_dead(&self, name: &str) {
        self.with_session(name, |s| s.pane_live = false);
    }

    /// The session exits `after` an interrupt is delivered.
    pub fn exit_after_interrupt(&self, name: &str, after: Duration) {
        self.with_session(name, |s| s.exits_after_interrupt = Some(after));
    }

    /// Fail the next `times` captures of `name`.
    pub fn fail_captures(&self, name: &str, times: u32) {
        self.inner
            .lock()
            .capture_failures
            .insert(name.to_string(), times);
    }

    pub fn fail_kill(&self, name: &str) {
        self.inner.lock().failing_kills.insert(name.to_string());
    }

    pub fn fail_interrupt(&self, name: &str) {
        self.inner
            .lock()
            .failing_interrupts
            .insert(name.to_string());
    }

    pub fn fail_send(&self, name: &str) {
        self.inner.lock().failing_sends.insert(name.to_string());
    }

    /// Make every call fail as if the multiplexer were unreachable.
    pub fn set_transport_down(&self, down: bool) {
        self.inner.lock().transport_down = down;
    }

    /// Current epoch seconds used for idle filtering.
    pub fn set_now_secs(&self, now_secs: u64) {
        self.inner.lock().now_secs = now_secs;
    }
}

impl FakeSessionState {
    fn record(&mut self, call: SessionCall) -> Result<(), SessionError> {
        self.calls.push(call);
        if self.transport_down {
            return Err(SessionError::CommandFailed("transport down".to_string()));
        }
        Ok(())
    }

    fn live(&mut self, name: &str) -> Option<&mut FakeSession> {
        if self.sessions.get(name).is_some_and(|s| !s.present()) {
            self.sessions.remove(name);
        }
        self.sessions.get_mut(name)
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn state_for(&self, name: &SessionName) -> Result<SessionState, SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::StateFor {
            name: name.to_string(),
        })?;
        Ok(match inner.live(name.as_str()) {
            Some(session) => SessionState {
                exists: true,
                has_live_pane: session.pane_live,
            },
            None => SessionState::GONE,
        })
    }

    async fn send_keys(
        &self,
        name: &SessionName,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::SendKeys {
            name: name.to_string(),
            text: text.to_string(),
            press_enter,
        })?;
        if inner.failing_sends.contains(name.as_str()) {
            return Err(SessionError::CommandFailed(format!("send to {name}")));
        }
        match inner.live(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(SessionError::NotFound(name.to_string())),
        }
    }

    async fn send_interrupt(&self, name: &SessionName) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::SendInterrupt {
            name: name.to_string(),
        })?;
        if inner.failing_interrupts.contains(name.as_str()) {
            return Err(SessionError::CommandFailed(format!("interrupt {name}")));
        }
        match inner.live(name.as_str()) {
            Some(session) => {
                if let Some(after) = session.exits_after_interrupt {
                    let at = Instant::now() + after;
                    session.exits_at = Some(session.exits_at.map_or(at, |t| t.min(at)));
                }
                Ok(())
            }
            None => Err(SessionError::NotFound(name.to_string())),
        }
    }

    async fn kill(&self, name: &SessionName) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::Kill {
            name: name.to_string(),
        })?;
        if inner.failing_kills.contains(name.as_str()) {
            return Err(SessionError::CommandFailed(format!("kill {name}")));
        }
        if inner.live(name.as_str()).is_none() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        inner.sessions.remove(name.as_str());
        Ok(())
    }

    async fn capture_pane_tail(
        &self,
        name: &SessionName,
        lines: u32,
    ) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::CapturePaneTail {
            name: name.to_string(),
            lines,
        })?;
        if let Some(remaining) = inner.capture_failures.get_mut(name.as_str()) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SessionError::CommandFailed(format!("capture {name}")));
            }
        }
        match inner.live(name.as_str()) {
            Some(session) => {
                let start = session.output.len().saturating_sub(lines as usize);
                Ok(session.output[start..].join("\n"))
            }
            None => Err(SessionError::NotFound(name.to_string())),
        }
    }

    async fn active_sessions_by_activity(
        &self,
        min_idle: Option<Duration>,
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::ActiveByActivity { min_idle })?;
        let now_secs = inner.now_secs;
        let mut sessions: Vec<SessionInfo> = inner
            .sessions
            .values()
            .filter(|s| s.present())
            .filter(|s| match min_idle {
                None => true,
                Some(idle) => s
                    .last_activity
                    .is_some_and(|at| now_secs.saturating_sub(at) >= idle.as_secs()),
            })
            .map(|s| s.info(None))
            .collect();
        sessions.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(sessions)
    }

    async fn sessions_with_tags(
        &self,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let mut inner = self.inner.lock();
        inner.record(SessionCall::SessionsWithTags {
            required: required.iter().map(|s| s.to_string()).collect(),
            optional: optional.iter().map(|s| s.to_string()).collect(),
        })?;
        let names: Vec<&str> = required.iter().chain(optional).copied().collect();
        let mut sessions: Vec<SessionInfo> = inner
            .sessions
            .values()
            .filter(|s| s.present())
            .map(|s| s.info(Some(&names)))
            .filter(|info| required.iter().all(|tag| info.tag(tag).is_some()))
            .collect();
        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
