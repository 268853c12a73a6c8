// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ExitClass;
use sb_adapters::{FakeSessionAdapter, SessionCall};
use sb_core::{TabEntry, TabId, WorkspaceId, WorkspaceRecord};
use sb_storage::FileWorkspaceStore;
use tempfile::TempDir;
use tokio::time::Instant;

fn name(s: &str) -> SessionName {
    SessionName::new(s)
}

fn graceful(ms: u64) -> StopMode {
    StopMode::Graceful {
        grace: Duration::from_millis(ms),
    }
}

fn agent(fake: &FakeSessionAdapter, session: &str, ws: &str, tab: &str) {
    fake.add_tagged_session(
        session,
        &[
            (tags::WORKSPACE, ws),
            (tags::TAB, tab),
            (tags::TYPE, "agent"),
            (tags::MANAGED, "1"),
        ],
    );
}

fn workspaces() -> (TempDir, FileWorkspaceStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path());
    (dir, store)
}

#[tokio::test(start_paused = true)]
async fn force_kills_without_interrupt() {
    let fake = FakeSessionAdapter::new();
    fake.add_session("sb-1");

    let outcome = stop_session(&fake, &name("sb-1"), StopMode::Force, &StopConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome, StopOutcome::Killed);
    assert_eq!(fake.kill_count("sb-1"), 1);
    assert!(!fake
        .calls()
        .iter()
        .any(|c| matches!(c, SessionCall::SendInterrupt { .. })));
}

#[tokio::test(start_paused = true)]
async fn session_exiting_during_grace_is_never_killed() {
    let fake = FakeSessionAdapter::new();
    fake.add_session("sb-1");
    fake.exit_after_interrupt("sb-1", Duration::from_millis(50));
    let start = Instant::now();

    let outcome = stop_session(&fake, &name("sb-1"), graceful(1200), &StopConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome, StopOutcome::Exited);
    assert_eq!(fake.kill_count("sb-1"), 0);
    assert!(start.elapsed() < Duration::from_millis(1200));
}

#[tokio::test(start_paused = true)]
async fn session_that_never_exits_is_killed_once_after_grace() {
    let fake = FakeSessionAdapter::new();
    fake.add_session("sb-1");
    let start = Instant::now();

    let outcome = stop_session(&fake, &name("sb-1"), graceful(1200), &StopConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome, StopOutcome::Killed);
    assert_eq!(fake.kill_count("sb-1"), 1);
    assert!(start.elapsed() >= Duration::from_millis(1200));
}

#[tokio::test(start_paused = true)]
async fn failed_interrupt_kills_immediately() {
    let fake = FakeSessionAdapter::new();
    fake.add_session("sb-1");
    fake.fail_interrupt("sb-1");
    let start = Instant::now();

    let outcome = stop_session(&fake, &name("sb-1"), graceful(1200), &StopConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome, StopOutcome::Killed);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn kill_of_missing_session_counts_as_stopped() {
    let fake = FakeSessionAdapter::new();

    let outcome = stop_session(&fake, &name("sb-1"), StopMode::Force, &StopConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome, StopOutcome::AlreadyGone);
}

#[tokio::test]
async fn kill_failure_is_transient() {
    let fake = FakeSessionAdapter::new();
    fake.add_session("sb-1");
    fake.fail_kill("sb-1");

    let err = stop_session(&fake, &name("sb-1"), StopMode::Force, &StopConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.exit_class(), ExitClass::Transient);
}

#[tokio::test]
async fn stop_all_requires_confirmation() {
    let fake = FakeSessionAdapter::new();
    agent(&fake, "sb-1", "ws", "t1");
    let (_dir, store) = workspaces();

    let err = stop_all(&fake, &store, StopMode::Force, &StopConfig::default(), false)
        .await
        .unwrap_err();

    assert_eq!(err.exit_class(), ExitClass::ConfirmationRequired);
    assert!(!err.cacheable());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn stop_all_reports_partial_failure() {
    let fake = FakeSessionAdapter::new();
    agent(&fake, "sb-a", "ws", "t1");
    agent(&fake, "sb-b", "ws", "t2");
    fake.set_activity("sb-a", 200);
    fake.set_activity("sb-b", 100);
    fake.fail_kill("sb-b");
    let (_dir, store) = workspaces();

    let err = stop_all(&fake, &store, StopMode::Force, &StopConfig::default(), true)
        .await
        .unwrap_err();

    let OpError::PartialFailure { stopped, failures } = err else {
        panic!("expected partial failure, got {err:?}");
    };
    assert_eq!(stopped.len(), 1);
    assert_eq!(stopped[0].session, "sb-a");
    assert_eq!(stopped[0].agent_id, Some(AgentId::new("ws", "t1")));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].session, "sb-b");
    assert_eq!(fake.kill_count("sb-a"), 1);
    assert_eq!(fake.kill_count("sb-b"), 1);
}

#[tokio::test]
async fn stop_all_with_every_stop_failing_is_batch_failure() {
    let fake = FakeSessionAdapter::new();
    agent(&fake, "sb-a", "ws", "t1");
    fake.fail_kill("sb-a");
    let (_dir, store) = workspaces();

    let err = stop_all(&fake, &store, StopMode::Force, &StopConfig::default(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "batch_failed");
    assert_eq!(err.exit_class(), ExitClass::Failure);
}

#[tokio::test]
async fn stop_all_with_nothing_to_stop_succeeds() {
    let fake = FakeSessionAdapter::new();
    let (_dir, store) = workspaces();

    let stopped = stop_all(&fake, &store, StopMode::Force, &StopConfig::default(), true)
        .await
        .unwrap();

    assert!(stopped.is_empty());
}

#[tokio::test]
async fn discovery_keeps_agents_and_untyped_managed_sessions() {
    let fake = FakeSessionAdapter::new();
    agent(&fake, "sb-agent", "ws", "t1");
    fake.add_tagged_session("sb-legacy", &[(tags::MANAGED, "yes")]);
    fake.add_tagged_session("sb-shell", &[(tags::MANAGED, "1"), (tags::TYPE, "shell")]);
    fake.add_tagged_session("sb-unowned", &[(tags::MANAGED, "0")]);
    fake.add_session("user-shell");
    fake.set_activity("sb-legacy", 300);
    fake.set_activity("sb-agent", 200);

    let found = discover_agent_sessions(&fake).await.unwrap();

    let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sb-legacy", "sb-agent"]);
}

#[tokio::test]
async fn stop_syncs_workspace_registry() {
    let fake = FakeSessionAdapter::new();
    agent(&fake, "sb-1", "ws", "t1");
    let (_dir, store) = workspaces();
    let mut record = WorkspaceRecord::new("ws");
    record.tabs.push(TabEntry {
        id: TabId::new("t1"),
        session: name("sb-1"),
        label: None,
    });
    store.save(&record).unwrap();

    let stopped = stop_all(&fake, &store, StopMode::Force, &StopConfig::default(), true)
        .await
        .unwrap();

    assert_eq!(stopped.len(), 1);
    let record = store.get(&WorkspaceId::new("ws")).unwrap();
    assert!(record.tabs.is_empty());
    assert_eq!(record.version, 1);
}
