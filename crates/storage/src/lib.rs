// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable state shared between `sb` invocations.
//!
//! Every record is its own JSON file. Writes go through a temp file and an
//! atomic rename; read-modify-write cycles hold an exclusive `fs2` lock on a
//! sidecar `.lock` file scoped to that one record.

mod error;
mod file;
mod idempotency;
mod jobs;
mod workspace;

pub use error::StorageError;
pub use idempotency::{IdempotencyStore, StoredResponse};
pub use jobs::JobStore;
pub use workspace::{FileWorkspaceStore, WorkspaceStore};
