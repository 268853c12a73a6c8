// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for engine tuning.
//!
//! Each knob falls back to the component's `Default` when unset or
//! unparseable.

use crate::{CaptureConfig, QueueConfig, StopConfig};
use std::time::Duration;

fn parse_u64(value: Option<String>) -> Option<u64> {
    value.and_then(|s| s.trim().parse::<u64>().ok())
}

fn var_u64(name: &str) -> Option<u64> {
    parse_u64(std::env::var(name).ok())
}

fn var_ms(name: &str) -> Option<Duration> {
    var_u64(name).map(Duration::from_millis)
}

/// `SB_CAPTURE_ATTEMPTS` and `SB_CAPTURE_DELAY_MS`.
pub fn capture_config() -> CaptureConfig {
    let default = CaptureConfig::default();
    CaptureConfig {
        attempts: var_u64("SB_CAPTURE_ATTEMPTS")
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(default.attempts),
        delay: var_ms("SB_CAPTURE_DELAY_MS").unwrap_or(default.delay),
    }
}

/// `SB_STOP_POLL_MS`.
pub fn stop_config() -> StopConfig {
    let default = StopConfig::default();
    StopConfig {
        poll_interval: var_ms("SB_STOP_POLL_MS")
            .filter(|d| !d.is_zero())
            .unwrap_or(default.poll_interval),
    }
}

/// `SB_JOB_POLL_MS`, `SB_JOB_TTL_SECS` and `SB_IDLE_POLL_MS`.
pub fn queue_config() -> QueueConfig {
    let default = QueueConfig::default();
    QueueConfig {
        poll_interval: var_ms("SB_JOB_POLL_MS")
            .filter(|d| !d.is_zero())
            .unwrap_or(default.poll_interval),
        retention: var_u64("SB_JOB_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(default.retention),
        idle_poll: var_ms("SB_IDLE_POLL_MS")
            .filter(|d| !d.is_zero())
            .unwrap_or(default.idle_poll),
        idle_lines: default.idle_lines,
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
