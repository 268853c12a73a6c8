//! Stop-all confirmation gate.

use crate::prelude::*;

fn recorded_responses(sb: &Sandbox) -> usize {
    std::fs::read_dir(sb.state_path().join("idempotency"))
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

#[test]
fn stop_all_requires_confirmation() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["stop", "--all"])
        .exits_with(4)
        .stderr_eq("Error: confirmation required: stopping all agent sessions requires --yes\n");
}

#[test]
fn unconfirmed_stop_all_is_never_recorded() {
    let sb = Sandbox::new();
    let args = ["stop", "--all", "--idempotency-key", "k1"];
    sb.sb().args(&args).exits_with(4);
    sb.sb().args(&args).exits_with(4);
    assert_eq!(recorded_responses(&sb), 0);
}

#[test]
fn confirmation_error_is_machine_readable() {
    let sb = Sandbox::new();
    let out = sb.sb().args(&["stop", "--all", "-o", "json"]).exits_with(4);
    assert_eq!(out.json()["error"]["kind"], "confirmation_required");
}
