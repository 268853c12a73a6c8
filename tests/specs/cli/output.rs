//! Machine-readable output.

use crate::prelude::*;

#[test]
fn json_errors_carry_kind_and_message() {
    let sb = Sandbox::new();
    let out = sb
        .sb()
        .args(&["-o", "json", "job", "status", "missing"])
        .exits_with(3);
    let json = out.json();
    assert_eq!(json["error"]["kind"], "not_found");
    assert_eq!(json["error"]["message"], "job not found: missing");
}

#[test]
fn json_job_list_is_an_array() {
    let sb = Sandbox::new();
    let out = sb.sb().args(&["job", "list", "-o", "json"]).passes();
    assert_eq!(out.json(), serde_json::json!([]));
}

#[test]
fn invocations_log_to_the_state_directory() {
    let sb = Sandbox::new();
    sb.sb().args(&["job", "list"]).passes();
    assert!(sb.state_path().join("logs/sb.log").exists());
}
