// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of operation outcomes.
//!
//! Every command renders to a single [`Response`] string before anything is
//! printed, so idempotent replays print exactly the same bytes.

use clap::ValueEnum;
use sb_engine::{ExitClass, OpError, Response};
use serde::Serialize;
use serde_json::json;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Process exit code for an error class.
pub fn exit_code(class: ExitClass) -> i32 {
    match class {
        ExitClass::Failure => 1,
        ExitClass::InvalidInput => 2,
        ExitClass::NotFound => 3,
        ExitClass::ConfirmationRequired => 4,
        ExitClass::PartialFailure => 5,
        ExitClass::Timeout => 6,
        ExitClass::Transient => 7,
    }
}

/// Render an operation result.
pub fn respond<T: Serialize>(
    format: OutputFormat,
    result: Result<T, OpError>,
    text: impl FnOnce(&T) -> String,
) -> Response {
    match result {
        Ok(value) => success(format, &value, text),
        Err(e) => failure(format, &e),
    }
}

pub fn success<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Response {
    let body = match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => to_json(value),
    };
    Response::new(0, body, true)
}

pub fn failure(format: OutputFormat, err: &OpError) -> Response {
    let body = match format {
        OutputFormat::Text => error_text(err),
        OutputFormat::Json => {
            let mut error = json!({
                "kind": err.kind(),
                "message": err.to_string(),
            });
            if let Some(details) = error_details(err) {
                error["details"] = details;
            }
            to_json(&json!({ "error": error }))
        }
    };
    Response::new(exit_code(err.exit_class()), body, err.cacheable())
}

fn error_details(err: &OpError) -> Option<serde_json::Value> {
    match err {
        OpError::PartialFailure { stopped, failures } => {
            Some(json!({ "stopped": stopped, "failures": failures }))
        }
        OpError::BatchFailed { failures } => Some(json!({ "failures": failures })),
        OpError::Timeout {
            job_id,
            last_status,
        } => Some(json!({ "job_id": job_id, "last_status": last_status })),
        OpError::JobFailed { job } | OpError::JobCanceled { job } => Some(json!({ "job": job })),
        _ => None,
    }
}

fn error_text(err: &OpError) -> String {
    let mut out = format!("Error: {}\n", err);
    let failures = match err {
        OpError::PartialFailure { stopped, failures } => {
            for s in stopped {
                out.push_str(&format!("  stopped {}\n", s.session));
            }
            failures
        }
        OpError::BatchFailed { failures } => failures,
        _ => return out,
    };
    for f in failures {
        out.push_str(&format!("  failed  {}: {}\n", f.session, f.error));
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(s) => s + "\n",
        Err(e) => format!("{{\"error\":{{\"kind\":\"render\",\"message\":\"{e}\"}}}}\n"),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
