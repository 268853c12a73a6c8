// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace records and their tab registry.
//!
//! Workspace records are owned by an external metadata store. This crate only
//! knows their shape well enough to find and drop tabs that point at a
//! session which no longer exists.

use crate::session::SessionName;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a workspace record.
    pub struct WorkspaceId;
}

crate::define_id! {
    /// Identifier of a tab inside a workspace.
    pub struct TabId;
}

/// One tab entry in a workspace's registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub id: TabId,
    pub session: SessionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A workspace record as persisted by the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    pub id: WorkspaceId,
    #[serde(default)]
    pub tabs: Vec<TabEntry>,
    /// Bumped by the store on every write.
    #[serde(default)]
    pub version: u64,
}

impl WorkspaceRecord {
    pub fn new(id: impl Into<WorkspaceId>) -> Self {
        Self {
            id: id.into(),
            tabs: Vec::new(),
            version: 0,
        }
    }

    /// Drop every tab bound to `session`. Returns the removed tab ids.
    pub fn remove_session_tabs(&mut self, session: &SessionName) -> Vec<TabId> {
        let mut removed = Vec::new();
        self.tabs.retain(|tab| {
            if &tab.session == session {
                removed.push(tab.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
