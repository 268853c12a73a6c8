// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sb_core::{SessionName, TabEntry, TabId};
use std::sync::Arc;
use tempfile::tempdir;

fn record(id: &str, tabs: &[(&str, &str)]) -> WorkspaceRecord {
    let mut record = WorkspaceRecord::new(id);
    record.tabs = tabs
        .iter()
        .map(|(tab, session)| TabEntry {
            id: TabId::new(*tab),
            session: SessionName::new(*session),
            label: None,
        })
        .collect();
    record
}

#[test]
fn list_returns_records_by_id() {
    let dir = tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path());
    store.save(&record("ws-b", &[])).unwrap();
    store.save(&record("ws-a", &[])).unwrap();

    let ids: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["ws-a", "ws-b"]);
}

#[test]
fn update_writes_and_bumps_version_on_change() {
    let dir = tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path());
    store.save(&record("ws", &[("t1", "sb-1"), ("t2", "sb-2")])).unwrap();

    let changed = store
        .update(&WorkspaceId::new("ws"), |r| {
            !r.remove_session_tabs(&SessionName::new("sb-1")).is_empty()
        })
        .unwrap();

    assert!(changed);
    let stored = store.get(&WorkspaceId::new("ws")).unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.tabs.len(), 1);
    assert_eq!(stored.tabs[0].id, "t2");
}

#[test]
fn update_without_change_keeps_version() {
    let dir = tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path());
    store.save(&record("ws", &[("t1", "sb-1")])).unwrap();

    let changed = store
        .update(&WorkspaceId::new("ws"), |r| {
            !r.remove_session_tabs(&SessionName::new("other")).is_empty()
        })
        .unwrap();

    assert!(!changed);
    assert_eq!(store.get(&WorkspaceId::new("ws")).unwrap().version, 0);
}

#[test]
fn update_unknown_record_is_not_found() {
    let dir = tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path());

    let result = store.update(&WorkspaceId::new("ghost"), |_| true);
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[test]
fn concurrent_updates_do_not_lose_writes() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileWorkspaceStore::new(dir.path()));
    let tabs: Vec<(String, String)> = (0..8)
        .map(|i| (format!("t{i}"), format!("sb-{i}")))
        .collect();
    let borrowed: Vec<(&str, &str)> = tabs.iter().map(|(t, s)| (t.as_str(), s.as_str())).collect();
    store.save(&record("ws", &borrowed)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .update(&WorkspaceId::new("ws"), |r| {
                        !r.remove_session_tabs(&SessionName::new(format!("sb-{i}")))
                            .is_empty()
                    })
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let stored = store.get(&WorkspaceId::new("ws")).unwrap();
    assert!(stored.tabs.is_empty());
    assert_eq!(stored.version, 8);
}
