// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent replay for mutating commands.
//!
//! The unit of replay is the rendered response (exit code and output bytes),
//! so a replay is byte-identical to the first execution.

use crate::OpError;
use sb_storage::IdempotencyStore;
use std::future::Future;

/// A command's rendered terminal response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub exit_code: i32,
    pub body: String,
    /// False for outcomes that must not be replayed (confirmation gates, transient failures).
    pub cacheable: bool,
    /// True when served from a stored record instead of executing.
    pub replayed: bool,
}

impl Response {
    pub fn new(exit_code: i32, body: impl Into<String>, cacheable: bool) -> Self {
        Self {
            exit_code,
            body: body.into(),
            cacheable,
            replayed: false,
        }
    }
}

pub struct Idempotency {
    store: IdempotencyStore,
}

impl Idempotency {
    pub fn new(store: IdempotencyStore) -> Self {
        Self { store }
    }

    /// Run `op` at most once per (command, key).
    ///
    /// With no key (or an empty one) `op` always runs and nothing is stored.
    /// Otherwise a stored response is replayed, or `op` runs and its
    /// response is recorded if cacheable. When another invocation records
    /// first, its response is returned instead of ours.
    pub async fn run<F, Fut>(
        &self,
        command: &str,
        key: Option<&str>,
        op: F,
    ) -> Result<Response, OpError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response>,
    {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Ok(op().await);
        };

        if let Some(stored) = self.store.lookup(command, key)? {
            tracing::info!(command, "replaying idempotent response");
            return Ok(replay(stored));
        }

        let response = op().await;
        if !response.cacheable {
            tracing::debug!(command, exit_code = response.exit_code, "response not cached");
            return Ok(response);
        }
        match self
            .store
            .record(command, key, response.exit_code, &response.body)
        {
            Ok(stored) if stored.body != response.body || stored.exit_code != response.exit_code => {
                tracing::info!(command, "lost record race, replaying first response");
                Ok(replay(stored))
            }
            Ok(_) => Ok(response),
            Err(e) => {
                tracing::warn!(command, error = %e, "failed to record idempotent response");
                Ok(response)
            }
        }
    }
}

fn replay(stored: sb_storage::StoredResponse) -> Response {
    Response {
        exit_code: stored.exit_code,
        body: stored.body,
        cacheable: true,
        replayed: true,
    }
}

#[cfg(test)]
#[path = "idempotency_tests.rs"]
mod tests;
