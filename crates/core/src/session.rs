// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sessions as reported by the terminal multiplexer.
//!
//! Nothing here is persisted: every value is a snapshot of live multiplexer
//! state at the moment it was queried.

use crate::workspace::{TabId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

crate::define_id! {
    /// Unique name of a multiplexer session.
    pub struct SessionName;
}

/// Tag names carried by sessions this system launches.
pub mod tags {
    pub const WORKSPACE: &str = "@sb_workspace";
    pub const TAB: &str = "@sb_tab";
    pub const TYPE: &str = "@sb_type";
    pub const MANAGED: &str = "@sb_managed";
}

/// Kind of process hosted by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Agent,
    Shell,
}

impl SessionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "agent" => Some(SessionType::Agent),
            "shell" => Some(SessionType::Shell),
            _ => None,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Agent => write!(f, "agent"),
            SessionType::Shell => write!(f, "shell"),
        }
    }
}

/// Liveness of a single session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub exists: bool,
    pub has_live_pane: bool,
}

impl SessionState {
    pub const GONE: SessionState = SessionState {
        exists: false,
        has_live_pane: false,
    };
}

/// A session row from a listing or tag query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: SessionName,
    /// Epoch seconds of the session's last activity, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<u64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl SessionInfo {
    pub fn new(name: impl Into<SessionName>) -> Self {
        Self {
            name: name.into(),
            last_activity: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tags.insert(key.to_string(), value.into());
        self
    }

    /// Tag value, treating empty strings as absent.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn workspace_id(&self) -> Option<WorkspaceId> {
        self.tag(tags::WORKSPACE).map(WorkspaceId::from)
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.tag(tags::TAB).map(TabId::from)
    }

    /// Session type tag. `None` when the tag is missing or unrecognized.
    pub fn session_type(&self) -> Option<SessionType> {
        self.tag(tags::TYPE).and_then(SessionType::parse)
    }

    /// Whether the ownership marker tag is set to a truthy value.
    pub fn is_managed(&self) -> bool {
        self.tag(tags::MANAGED).is_some_and(is_truthy)
    }

    /// Fill tags and activity missing here from `other`. Existing values win.
    pub fn merge_missing(&mut self, other: &SessionInfo) {
        if self.last_activity.is_none() {
            self.last_activity = other.last_activity;
        }
        for (key, value) in &other.tags {
            if self.tag(key).is_none() && !value.is_empty() {
                self.tags.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Multiplexer option values that count as "on".
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
