// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Switchboard engine: idempotent replay, send jobs, pane capture and
//! session lifecycle over an injected session adapter.

mod capture;
pub mod env;
mod error;
mod idempotency;
mod jobs;
mod lifecycle;
mod poll;
mod registry;
mod resolve;

pub use capture::{capture, capture_with_retry, peek, Capture, CaptureConfig, PeekReport};
pub use error::{ExitClass, OpError};
pub use idempotency::{Idempotency, Response};
pub use jobs::{Dispatcher, QueueConfig, SendMode, SendQueue};
pub use lifecycle::{
    discover_agent_sessions, stop_all, stop_and_sync, stop_session, StopConfig, StopFailure,
    StopMode, StopOutcome, StoppedSession,
};
pub use poll::{Poller, Tick};
pub use registry::{remove_session_tabs, RemovedTabs};
pub use resolve::{parse_agent_id, resolve_agent, resolve_session, ResolvedSession, Target};
