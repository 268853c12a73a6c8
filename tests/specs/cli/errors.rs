//! Argument validation happens before any session is touched.

use crate::prelude::*;

#[test]
fn malformed_agent_id_is_invalid_input() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["send", "--agent", "no-colon", "hello"])
        .exits_with(2)
        .stderr_has("malformed agent id");
}

#[test]
fn conflicting_selectors_are_rejected() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["stop", "--session", "s1", "--all", "--yes"])
        .exits_with(2)
        .stderr_eq("Error: invalid input: --session, --agent and --all are mutually exclusive\n");
}

#[test]
fn missing_target_is_rejected() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["peek"])
        .exits_with(2)
        .stderr_has("a target is required");
}

#[test]
fn send_without_text_is_rejected() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["send", "--session", "s1"])
        .exits_with(2)
        .stderr_eq("Error: invalid input: text to send is required\n");
}

#[test]
fn zero_line_peek_is_rejected() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["peek", "--session", "s1", "--lines", "0"])
        .exits_with(2)
        .stderr_eq("Error: invalid input: --lines must be positive\n");
}

#[test]
fn zero_grace_is_rejected() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["stop", "--session", "s1", "--grace-ms", "0"])
        .exits_with(2)
        .stderr_has("--grace-ms must be positive");
}
