// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

use crate::subprocess::TMUX_TIMEOUT;

/// Per-call tmux timeout (default: 10s).
pub fn tmux_timeout() -> Duration {
    std::env::var("SB_TMUX_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(TMUX_TIMEOUT)
}

/// Dedicated tmux server socket name (`tmux -L`), if any.
pub fn tmux_socket() -> Option<String> {
    std::env::var("SB_TMUX_SOCKET").ok().filter(|s| !s.is_empty())
}
