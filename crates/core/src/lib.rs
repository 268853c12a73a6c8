// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sb-core: domain types for the switchboard session control plane

pub mod agent_id;
pub mod clock;
pub mod id;
pub mod job;
pub mod prompt;
pub mod session;
pub mod workspace;

pub use agent_id::{AgentId, AgentIdError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::{
    IdleWait, JobId, JobResult, JobStatus, SendJob, SendPayload, TransitionError,
};
pub use prompt::{detect_needs_input, summarize, NeedsInput};
pub use session::{is_truthy, tags, SessionInfo, SessionName, SessionState, SessionType};
pub use workspace::{TabEntry, TabId, WorkspaceId, WorkspaceRecord};
