// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Resolve state directory: SB_STATE_DIR > XDG_STATE_HOME/sb > ~/.local/state/sb
pub fn state_dir() -> Result<PathBuf> {
    resolve_state_dir(
        std::env::var("SB_STATE_DIR").ok(),
        std::env::var("XDG_STATE_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_state_dir(
    explicit: Option<String>,
    xdg: Option<String>,
    home: Option<String>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit.filter(|s| !s.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = xdg.filter(|s| !s.is_empty()) {
        return Ok(PathBuf::from(xdg).join("sb"));
    }
    let home = home
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("cannot determine state directory: set SB_STATE_DIR or HOME"))?;
    Ok(PathBuf::from(home).join(".local/state/sb"))
}

/// Tracing filter directive from SB_LOG (default: info).
pub fn log_filter() -> String {
    std::env::var("SB_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
