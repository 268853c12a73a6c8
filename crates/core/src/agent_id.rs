// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identifiers: a `workspace:tab` pair that names an agent for display
//! and lookup. An agent id is never stored; it is resolved to a session name
//! by querying session tags.

use crate::workspace::{TabId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentIdError {
    #[error("malformed agent id {0:?}: expected <workspace>:<tab>")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId {
    pub workspace: WorkspaceId,
    pub tab: TabId,
}

impl AgentId {
    pub fn new(workspace: impl Into<WorkspaceId>, tab: impl Into<TabId>) -> Self {
        Self {
            workspace: workspace.into(),
            tab: tab.into(),
        }
    }
}

impl FromStr for AgentId {
    type Err = AgentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AgentIdError::Malformed(s.to_string());
        let (workspace, tab) = s.split_once(':').ok_or_else(malformed)?;
        let valid = |part: &str| !part.is_empty() && !part.contains(char::is_whitespace);
        if !valid(workspace) || !valid(tab) || tab.contains(':') {
            return Err(malformed());
        }
        Ok(AgentId::new(workspace, tab))
    }
}

impl TryFrom<String> for AgentId {
    type Error = AgentIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AgentId> for String {
    fn from(id: AgentId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workspace, self.tab)
    }
}

#[cfg(test)]
#[path = "agent_id_tests.rs"]
mod tests;
