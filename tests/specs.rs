//! Black-box behavior tests for the sb CLI.
//!
//! Each test invokes the built binary against an isolated state directory
//! and a tmux socket with no server behind it, then checks exit codes and
//! output.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/output.rs"]
mod cli_output;

// job/
#[path = "specs/job/queries.rs"]
mod job_queries;

// stop/
#[path = "specs/stop/confirm.rs"]
mod stop_confirm;
