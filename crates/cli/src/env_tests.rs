// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;
use yare::parameterized;

#[parameterized(
    explicit_wins = { Some("/tmp/sb"), Some("/xdg"), Some("/home/u"), "/tmp/sb" },
    xdg = { None, Some("/xdg"), Some("/home/u"), "/xdg/sb" },
    home = { None, None, Some("/home/u"), "/home/u/.local/state/sb" },
    empty_explicit = { Some(""), None, Some("/home/u"), "/home/u/.local/state/sb" },
)]
fn state_dir_precedence(explicit: Option<&str>, xdg: Option<&str>, home: Option<&str>, expected: &str) {
    let dir = resolve_state_dir(
        explicit.map(String::from),
        xdg.map(String::from),
        home.map(String::from),
    )
    .unwrap();
    assert_eq!(dir, PathBuf::from(expected));
}

#[test]
fn no_home_is_an_error() {
    assert!(resolve_state_dir(None, None, None).is_err());
}

#[test]
#[serial] // Tests modify SB_STATE_DIR which is process-wide
fn state_dir_reads_environment() {
    let dir = tempdir().unwrap();
    std::env::set_var("SB_STATE_DIR", dir.path());
    let resolved = state_dir();
    std::env::remove_var("SB_STATE_DIR");
    assert_eq!(resolved.unwrap(), dir.path());
}

#[test]
#[serial]
fn log_filter_defaults_to_info() {
    std::env::set_var("SB_LOG", "");
    assert_eq!(log_filter(), "info");
    std::env::set_var("SB_LOG", "sb_engine=debug");
    assert_eq!(log_filter(), "sb_engine=debug");
    std::env::remove_var("SB_LOG");
}
