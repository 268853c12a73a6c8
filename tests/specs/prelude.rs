//! Helpers for the black-box CLI tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Keep multiplexer calls and polling short so failures surface quickly.
const SB_TMUX_TIMEOUT_MS: &str = "2000";
const SB_STOP_POLL_MS: &str = "10";
const SB_JOB_POLL_MS: &str = "10";
const SB_CAPTURE_DELAY_MS: &str = "10";

/// Returns the path to the sb binary.
///
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR points at a different target directory.
fn sb_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug/sb");
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug/sb");
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("sb");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Isolated environment for one test: its own state directory and its own
/// tmux socket name, so no real sessions are ever touched.
pub struct Sandbox {
    state_dir: tempfile::TempDir,
    socket: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let state_dir = tempfile::tempdir().unwrap();
        let socket = format!(
            "sb-test-{}-{}",
            std::process::id(),
            state_dir
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        Self { state_dir, socket }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Start building an sb invocation inside this sandbox.
    pub fn sb(&self) -> CliBuilder {
        CliBuilder {
            args: Vec::new(),
            envs: vec![
                (
                    "SB_STATE_DIR".into(),
                    self.state_path().to_string_lossy().into(),
                ),
                ("SB_TMUX_SOCKET".into(), self.socket.clone()),
                ("SB_TMUX_TIMEOUT_MS".into(), SB_TMUX_TIMEOUT_MS.into()),
                ("SB_STOP_POLL_MS".into(), SB_STOP_POLL_MS.into()),
                ("SB_JOB_POLL_MS".into(), SB_JOB_POLL_MS.into()),
                ("SB_CAPTURE_DELAY_MS".into(), SB_CAPTURE_DELAY_MS.into()),
            ],
        }
    }

    /// Write a raw file under the state directory.
    pub fn state_file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.state_path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(sb_binary());
        cmd.args(&self.args);
        cmd.env_remove("SB_LOG");
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        self.exits_with(0)
    }

    /// Run and expect the given exit code
    pub fn exits_with(self, code: i32) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Parse stdout (or stderr on failure) as JSON.
    pub fn json(&self) -> serde_json::Value {
        let text = if self.output.status.success() {
            self.stdout()
        } else {
            self.stderr()
        };
        serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("output is not JSON ({e}): {text}"))
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Assert stderr equals expected exactly (with diff on failure).
    pub fn stderr_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stderr(), expected);
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}
