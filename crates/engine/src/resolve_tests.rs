// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ExitClass;
use sb_adapters::FakeSessionAdapter;
use yare::parameterized;

#[parameterized(
    none = { None, None, false },
    session_and_agent = { Some("sb-1"), Some("ws:t1"), false },
    session_and_all = { Some("sb-1"), None, true },
    agent_and_all = { None, Some("ws:t1"), true },
    empty_session = { Some("  "), None, false },
    malformed_agent = { None, Some("ws-only"), false },
)]
fn invalid_selectors(session: Option<&str>, agent: Option<&str>, all: bool) {
    let err = Target::from_selectors(session, agent, all).unwrap_err();
    assert_eq!(err.exit_class(), ExitClass::InvalidInput);
}

#[test]
fn valid_selectors() {
    assert_eq!(
        Target::from_selectors(Some("sb-1"), None, false).unwrap(),
        Target::Session(SessionName::new("sb-1"))
    );
    assert_eq!(
        Target::from_selectors(None, Some("ws:t1"), false).unwrap(),
        Target::Agent(AgentId::new("ws", "t1"))
    );
    assert_eq!(Target::from_selectors(None, None, true).unwrap(), Target::All);
}

#[tokio::test]
async fn agent_resolves_by_workspace_and_tab_tags() {
    let fake = FakeSessionAdapter::new();
    fake.add_tagged_session("sb-a", &[(tags::WORKSPACE, "ws"), (tags::TAB, "t1")]);
    fake.add_tagged_session("sb-b", &[(tags::WORKSPACE, "ws"), (tags::TAB, "t2")]);

    let resolved = resolve_session(&fake, &Target::Agent(AgentId::new("ws", "t2")))
        .await
        .unwrap();

    assert_eq!(resolved.session, "sb-b");
    assert_eq!(resolved.agent_id, Some(AgentId::new("ws", "t2")));
}

#[tokio::test]
async fn unknown_agent_is_not_found_not_invalid() {
    let fake = FakeSessionAdapter::new();
    fake.add_tagged_session("sb-a", &[(tags::WORKSPACE, "ws"), (tags::TAB, "t1")]);

    let err = resolve_session(&fake, &Target::Agent(AgentId::new("ws", "t9")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "not_found");
    assert_eq!(err.to_string(), "agent not found: ws:t9");
}

#[tokio::test]
async fn missing_session_is_not_found() {
    let fake = FakeSessionAdapter::new();

    let err = resolve_session(&fake, &Target::Session(SessionName::new("ghost")))
        .await
        .unwrap_err();

    assert_eq!(err.exit_class(), ExitClass::NotFound);
}

#[tokio::test]
async fn all_is_rejected_for_single_session_commands() {
    let fake = FakeSessionAdapter::new();
    let err = resolve_session(&fake, &Target::All).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
}
