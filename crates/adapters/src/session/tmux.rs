// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{SessionAdapter, SessionError};
use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use sb_core::{tags, SessionInfo, SessionName, SessionState};
use std::process::Output;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::process::Command;

/// Tags read on every listing so activity rows carry the standard metadata.
const STANDARD_TAGS: &[&str] = &[tags::WORKSPACE, tags::TAB, tags::TYPE, tags::MANAGED];

/// Tmux-based session adapter
#[derive(Clone)]
pub struct TmuxAdapter {
    socket: Option<String>,
    timeout: Duration,
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self {
            socket: crate::env::tmux_socket(),
            timeout: crate::env::tmux_timeout(),
        }
    }
}

impl TmuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("tmux");
        if let Some(socket) = &self.socket {
            cmd.args(["-L", socket]);
        }
        cmd.args(args);
        cmd
    }

    /// Run tmux, mapping a failure to start or a timeout to `CommandFailed`.
    async fn run(&self, args: &[&str], description: &str) -> Result<Output, SessionError> {
        run_with_timeout(self.command(args), self.timeout, description)
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))
    }

    /// Run a tmux command against `name`, failing on non-zero exit.
    async fn run_on(
        &self,
        name: &SessionName,
        args: &[&str],
        description: &str,
    ) -> Result<Output, SessionError> {
        let output = self.run(args, description).await?;
        if output.status.success() {
            return Ok(output);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_missing_target(&stderr) {
            Err(SessionError::NotFound(name.to_string()))
        } else {
            Err(SessionError::CommandFailed(format!(
                "{}: {}",
                description,
                stderr.trim()
            )))
        }
    }

    async fn list_sessions(&self, tag_names: &[&str]) -> Result<Vec<SessionInfo>, SessionError> {
        let format = list_format(tag_names);
        let output = self
            .run(&["list-sessions", "-F", &format], "tmux list-sessions")
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // No server means no sessions, not a transport failure
            if is_no_server(&stderr) {
                return Ok(Vec::new());
            }
            return Err(SessionError::CommandFailed(format!(
                "tmux list-sessions: {}",
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter_map(|line| parse_session_line(line, tag_names))
            .collect())
    }
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn state_for(&self, name: &SessionName) -> Result<SessionState, SessionError> {
        let target = exact(name);
        let output = self
            .run(
                &["list-panes", "-s", "-t", &target, "-F", "#{pane_dead}"],
                "tmux list-panes",
            )
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_missing_target(&stderr) {
                return Ok(SessionState::GONE);
            }
            return Err(SessionError::CommandFailed(format!(
                "tmux list-panes: {}",
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(SessionState {
            exists: true,
            has_live_pane: stdout.lines().any(|l| l.trim() == "0"),
        })
    }

    async fn send_keys(
        &self,
        name: &SessionName,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError> {
        let target = exact(name);
        // -l = literal mode, -- = end of options (text may start with -)
        self.run_on(
            name,
            &["send-keys", "-t", &target, "-l", "--", text],
            "tmux send-keys literal",
        )
        .await?;
        if press_enter {
            self.run_on(
                name,
                &["send-keys", "-t", &target, "Enter"],
                "tmux send-keys enter",
            )
            .await?;
        }
        Ok(())
    }

    async fn send_interrupt(&self, name: &SessionName) -> Result<(), SessionError> {
        let target = exact(name);
        self.run_on(
            name,
            &["send-keys", "-t", &target, "C-c"],
            "tmux send-keys interrupt",
        )
        .await
        .map(|_| ())
    }

    async fn kill(&self, name: &SessionName) -> Result<(), SessionError> {
        let target = exact(name);
        self.run_on(name, &["kill-session", "-t", &target], "tmux kill-session")
            .await
            .map(|_| ())
    }

    async fn capture_pane_tail(
        &self,
        name: &SessionName,
        lines: u32,
    ) -> Result<String, SessionError> {
        let target = exact(name);
        let start = format!("-{}", lines);
        let output = self
            .run_on(
                name,
                &["capture-pane", "-p", "-t", &target, "-S", &start],
                "tmux capture-pane",
            )
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn active_sessions_by_activity(
        &self,
        min_idle: Option<Duration>,
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let sessions = self.list_sessions(STANDARD_TAGS).await?;
        Ok(order_by_activity(sessions, min_idle, now_secs()))
    }

    async fn sessions_with_tags(
        &self,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Vec<SessionInfo>, SessionError> {
        let names: Vec<&str> = required.iter().chain(optional).copied().collect();
        let sessions = self.list_sessions(&names).await?;
        Ok(sessions
            .into_iter()
            .filter(|s| required.iter().all(|tag| s.tag(tag).is_some()))
            .collect())
    }
}

/// Exact-match target so `sb-1` never resolves to `sb-10`.
fn exact(name: &SessionName) -> String {
    format!("={}", name)
}

fn is_no_server(stderr: &str) -> bool {
    stderr.contains("no server running") || stderr.contains("error connecting to")
}

fn is_missing_target(stderr: &str) -> bool {
    is_no_server(stderr)
        || stderr.contains("can't find session")
        || stderr.contains("can't find pane")
        || stderr.contains("can't find window")
        || stderr.contains("session not found")
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `list-sessions -F` format: name, activity, then one field per tag.
pub(crate) fn list_format(tag_names: &[&str]) -> String {
    let mut format = String::from("#{session_name}\t#{session_activity}");
    for tag in tag_names {
        format.push_str("\t#{");
        format.push_str(tag);
        format.push('}');
    }
    format
}

/// Parse one line produced by [`list_format`].
pub(crate) fn parse_session_line(line: &str, tag_names: &[&str]) -> Option<SessionInfo> {
    let mut fields = line.split('\t');
    let name = fields.next().filter(|n| !n.is_empty())?;
    let mut info = SessionInfo::new(name);
    info.last_activity = fields.next().and_then(|a| a.trim().parse().ok());
    for (tag, value) in tag_names.iter().zip(fields) {
        if !value.is_empty() {
            info.tags.insert((*tag).to_string(), value.to_string());
        }
    }
    Some(info)
}

/// Newest activity first; sessions without an activity stamp sort last.
pub(crate) fn order_by_activity(
    mut sessions: Vec<SessionInfo>,
    min_idle: Option<Duration>,
    now_secs: u64,
) -> Vec<SessionInfo> {
    if let Some(min_idle) = min_idle {
        let min_idle = min_idle.as_secs();
        sessions.retain(|s| {
            s.last_activity
                .is_some_and(|at| now_secs.saturating_sub(at) >= min_idle)
        });
    }
    sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    sessions
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
