// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heuristic detection of interactive prompts in captured pane text.
//!
//! Only the last non-blank line is inspected. A line counts as a prompt when
//! it ends in a question mark, offers a parenthesized or bracketed yes/no
//! choice, or asks for a key press.

use serde::Serialize;

const KEYPRESS_PHRASES: &[&str] = &[
    "press enter",
    "press return",
    "press any key",
    "hit enter",
    "hit return",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NeedsInput {
    pub needs_input: bool,
    /// The matched line, whitespace-normalized. Empty when nothing matched.
    pub hint: String,
}

/// Inspect captured text for an interactive prompt.
pub fn detect_needs_input(text: &str) -> NeedsInput {
    let Some(line) = text.lines().rev().find(|l| !l.trim().is_empty()) else {
        return NeedsInput::default();
    };
    let normalized = normalize(line);
    if is_prompt(&normalized) {
        NeedsInput {
            needs_input: true,
            hint: normalized,
        }
    } else {
        NeedsInput::default()
    }
}

/// One-line human summary of a session's state.
pub fn summarize(idle: bool, detection: &NeedsInput) -> String {
    let state = if idle { "idle" } else { "busy" };
    if detection.needs_input {
        format!("{state}, needs input: {}", detection.hint)
    } else {
        state.to_string()
    }
}

fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_prompt(line: &str) -> bool {
    if line.ends_with('?') {
        return true;
    }
    let lower = line.to_ascii_lowercase();
    has_yes_no_choice(&lower) || KEYPRESS_PHRASES.iter().any(|p| lower.contains(p))
}

/// Finds `(y/n)`, `[Y/n]`, `(yes/no)` and similar groups.
fn has_yes_no_choice(lower: &str) -> bool {
    let mut rest = lower;
    while let Some(start) = rest.find(['(', '[']) {
        let close = if rest[start..].starts_with('(') { ')' } else { ']' };
        let body = &rest[start + 1..];
        let Some(end) = body.find(close) else {
            return false;
        };
        let options: Vec<&str> = body[..end].split('/').map(str::trim).collect();
        let yes = options.iter().any(|o| *o == "y" || *o == "yes");
        let no = options.iter().any(|o| *o == "n" || *o == "no");
        if yes && no {
            return true;
        }
        rest = &body[end + 1..];
    }
    false
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
