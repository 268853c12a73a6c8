//! Job status, cancel, wait and prune against a seeded job store.

use crate::prelude::*;

const PENDING_JOB: &str = r#"{
  "id": "job-1",
  "session": "sb-ws-tab",
  "agent_id": "ws:tab",
  "status": "pending",
  "created_at_ms": 1000,
  "updated_at_ms": 1000,
  "payload": { "text": "hello", "press_enter": true }
}"#;

fn seeded() -> Sandbox {
    let sb = Sandbox::new();
    sb.state_file("jobs/job-1.json", PENDING_JOB);
    sb
}

#[test]
fn unknown_job_is_not_found() {
    let sb = Sandbox::new();
    sb.sb()
        .args(&["job", "status", "nope"])
        .exits_with(3)
        .stderr_eq("Error: job not found: nope\n");
}

#[test]
fn canceling_unknown_job_is_not_found() {
    let sb = Sandbox::new();
    sb.sb().args(&["job", "cancel", "nope"]).exits_with(3);
}

#[test]
fn empty_store_lists_no_jobs() {
    let sb = Sandbox::new();
    sb.sb().args(&["job", "list"]).passes().stdout_eq("No jobs\n");
}

#[test]
fn status_shows_seeded_job() {
    let sb = seeded();
    sb.sb()
        .args(&["job", "status", "job-1"])
        .passes()
        .stdout_eq("job-1  pending    ws:tab (sb-ws-tab)\n");
}

#[test]
fn cancel_then_status_reports_canceled() {
    let sb = seeded();
    sb.sb()
        .args(&["job", "cancel", "job-1"])
        .passes()
        .stdout_eq("Canceled job job-1\n");
    sb.sb()
        .args(&["job", "status", "job-1"])
        .passes()
        .stdout_eq("job-1  canceled   ws:tab (sb-ws-tab)\n");
}

#[test]
fn second_cancel_without_key_reports_not_canceled() {
    let sb = seeded();
    sb.sb().args(&["job", "cancel", "job-1"]).passes();
    sb.sb()
        .args(&["job", "cancel", "job-1"])
        .passes()
        .stdout_eq("Job job-1 is canceled; not canceled\n");
}

#[test]
fn cancel_with_key_replays_first_response() {
    let sb = seeded();
    let args = ["job", "cancel", "job-1", "--idempotency-key", "k1"];
    sb.sb()
        .args(&args)
        .passes()
        .stdout_eq("Canceled job job-1\n");
    sb.sb()
        .args(&args)
        .passes()
        .stdout_eq("Canceled job job-1\n");
}

#[test]
fn waiting_on_canceled_job_fails() {
    let sb = seeded();
    sb.sb().args(&["job", "cancel", "job-1"]).passes();
    sb.sb()
        .args(&["job", "wait", "job-1", "--timeout-ms", "2000"])
        .exits_with(1)
        .stderr_eq("Error: job job-1 was canceled\n");
}

#[test]
fn waiting_on_pending_job_times_out() {
    let sb = seeded();
    sb.sb()
        .args(&["job", "wait", "job-1", "--timeout-ms", "50", "--poll-ms", "10"])
        .exits_with(6)
        .stderr_eq("Error: timed out waiting for job job-1 (last status: pending)\n");
}

#[test]
fn prune_keeps_recent_and_pending_jobs() {
    let sb = seeded();
    sb.sb().args(&["job", "cancel", "job-1"]).passes();
    sb.sb()
        .args(&["job", "prune"])
        .passes()
        .stdout_eq("Pruned 0 job(s)\n");
    sb.sb().args(&["job", "status", "job-1"]).passes();
}
