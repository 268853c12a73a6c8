// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded polling loops.
//!
//! Uses tokio's clock so paused-time tests advance deterministically.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Ready,
    /// Deadline reached; the caller should stop polling.
    Timeout,
}

/// Fixed-interval poll schedule, optionally bounded by a deadline.
pub struct Poller {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Poller {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            interval,
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// Wait for the next poll tick.
    ///
    /// Sleeps for the interval, cut short at the deadline. Returns
    /// [`Tick::Timeout`] once the deadline has been reached.
    pub async fn tick(&mut self) -> Tick {
        let now = Instant::now();
        match self.deadline {
            Some(deadline) if now >= deadline => Tick::Timeout,
            Some(deadline) => {
                tokio::time::sleep_until((now + self.interval).min(deadline)).await;
                if Instant::now() >= deadline {
                    Tick::Timeout
                } else {
                    Tick::Ready
                }
            }
            None => {
                tokio::time::sleep(self.interval).await;
                Tick::Ready
            }
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
