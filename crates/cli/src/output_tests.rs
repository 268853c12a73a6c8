// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sb_core::{JobId, JobStatus, SessionName};
use sb_engine::{StopFailure, StopOutcome, StoppedSession};
use yare::parameterized;

#[parameterized(
    failure = { ExitClass::Failure, 1 },
    invalid = { ExitClass::InvalidInput, 2 },
    not_found = { ExitClass::NotFound, 3 },
    confirm = { ExitClass::ConfirmationRequired, 4 },
    partial = { ExitClass::PartialFailure, 5 },
    timeout = { ExitClass::Timeout, 6 },
    transient = { ExitClass::Transient, 7 },
)]
fn exit_codes(class: ExitClass, code: i32) {
    assert_eq!(exit_code(class), code);
}

#[test]
fn success_text_uses_renderer() {
    let response = success(OutputFormat::Text, &3u32, |n| format!("{n} things\n"));
    assert_eq!(response.exit_code, 0);
    assert_eq!(response.body, "3 things\n");
    assert!(response.cacheable);
}

#[test]
fn json_error_has_kind_and_details() {
    let err = OpError::Timeout {
        job_id: JobId::new("job-1"),
        last_status: JobStatus::Running,
    };

    let response = failure(OutputFormat::Json, &err);

    assert_eq!(response.exit_code, 6);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["error"]["kind"], "timeout");
    assert_eq!(value["error"]["details"]["last_status"], "running");
    assert_eq!(value["error"]["details"]["job_id"], "job-1");
}

#[test]
fn confirmation_failure_is_not_cacheable() {
    let err = OpError::ConfirmationRequired("pass --yes".into());
    let response = failure(OutputFormat::Text, &err);
    assert_eq!(response.exit_code, 4);
    assert!(!response.cacheable);
}

#[test]
fn partial_failure_text_lists_both_sides() {
    let err = OpError::PartialFailure {
        stopped: vec![StoppedSession {
            session: SessionName::new("sb-a"),
            agent_id: None,
            outcome: StopOutcome::Killed,
        }],
        failures: vec![StopFailure {
            session: SessionName::new("sb-b"),
            agent_id: None,
            error: "kill failed".into(),
        }],
    };

    let response = failure(OutputFormat::Text, &err);

    assert_eq!(response.exit_code, 5);
    assert_eq!(
        response.body,
        "Error: stopped 1 session(s), 1 failed\n  stopped sb-a\n  failed  sb-b: kill failed\n"
    );
}
