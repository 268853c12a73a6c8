// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keeps workspace tab registries in step with stopped sessions.

use sb_core::{SessionName, TabId, WorkspaceId};
use sb_storage::{StorageError, WorkspaceStore};

/// Tabs removed from one workspace record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTabs {
    pub workspace: WorkspaceId,
    pub tabs: Vec<TabId>,
}

/// Drop tabs bound to `session` from the first workspace that has any.
///
/// Session names are globally unique, so scanning stops after the first
/// record that changed. Records without a matching tab are never rewritten.
pub fn remove_session_tabs<W: WorkspaceStore>(
    store: &W,
    session: &SessionName,
) -> Result<Option<RemovedTabs>, StorageError> {
    for record in store.list()? {
        if !record.tabs.iter().any(|tab| &tab.session == session) {
            continue;
        }
        let mut removed = Vec::new();
        let changed = store.update(&record.id, |current| {
            removed = current.remove_session_tabs(session);
            !removed.is_empty()
        })?;
        if changed {
            tracing::info!(%session, workspace = %record.id, tabs = ?removed, "removed stale tabs");
            return Ok(Some(RemovedTabs {
                workspace: record.id,
                tabs: removed,
            }));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
