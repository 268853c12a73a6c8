// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target selection and agent id resolution.

use crate::OpError;
use sb_adapters::SessionAdapter;
use sb_core::{tags, AgentId, SessionInfo, SessionName};

/// What a command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Session(SessionName),
    Agent(AgentId),
    All,
}

impl Target {
    /// Build a target from mutually exclusive selectors.
    ///
    /// Exactly one of `session`, `agent` or `all` must be given. The agent
    /// id is parsed here so a malformed id fails before any side effect.
    pub fn from_selectors(
        session: Option<&str>,
        agent: Option<&str>,
        all: bool,
    ) -> Result<Self, OpError> {
        match (session, agent, all) {
            (Some(name), None, false) => {
                if name.trim().is_empty() {
                    return Err(OpError::InvalidInput("session name is empty".to_string()));
                }
                Ok(Target::Session(SessionName::new(name)))
            }
            (None, Some(agent), false) => Ok(Target::Agent(parse_agent_id(agent)?)),
            (None, None, true) => Ok(Target::All),
            (None, None, false) => Err(OpError::InvalidInput(
                "a target is required: --session, --agent or --all".to_string(),
            )),
            _ => Err(OpError::InvalidInput(
                "--session, --agent and --all are mutually exclusive".to_string(),
            )),
        }
    }
}

/// A single session a command will act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub session: SessionName,
    pub agent_id: Option<AgentId>,
}

pub fn parse_agent_id(s: &str) -> Result<AgentId, OpError> {
    s.parse()
        .map_err(|e: sb_core::AgentIdError| OpError::InvalidInput(e.to_string()))
}

/// Find the session tagged with the agent's workspace and tab.
pub async fn resolve_agent<S: SessionAdapter>(
    sessions: &S,
    agent: &AgentId,
) -> Result<SessionInfo, OpError> {
    let candidates = sessions
        .sessions_with_tags(&[tags::WORKSPACE, tags::TAB], &[tags::TYPE, tags::MANAGED])
        .await?;
    candidates
        .into_iter()
        .find(|s| {
            s.tag(tags::WORKSPACE) == Some(agent.workspace.as_str())
                && s.tag(tags::TAB) == Some(agent.tab.as_str())
        })
        .ok_or_else(|| OpError::not_found("agent", agent.to_string()))
}

/// Resolve a single-session target and check that the session exists.
pub async fn resolve_session<S: SessionAdapter>(
    sessions: &S,
    target: &Target,
) -> Result<ResolvedSession, OpError> {
    let resolved = match target {
        Target::Session(name) => ResolvedSession {
            session: name.clone(),
            agent_id: None,
        },
        Target::Agent(agent) => ResolvedSession {
            session: resolve_agent(sessions, agent).await?.name,
            agent_id: Some(agent.clone()),
        },
        Target::All => {
            return Err(OpError::InvalidInput(
                "--all is only valid for stop".to_string(),
            ))
        }
    };
    if !sessions.state_for(&resolved.session).await?.exists {
        return Err(OpError::not_found("session", resolved.session.to_string()));
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
