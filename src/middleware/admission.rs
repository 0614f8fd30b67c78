//! Admission policy.
//!
//! Maps a [`Verdict`] to what the pipeline does about it:
//!
//! | Verdict | Block | Reduce logging |
//! |---|---|---|
//! | `legitimate` | no | no |
//! | `bot` | no | yes |
//! | `suspicious` | yes | no |
//! | `attack` | yes | yes |
//!
//! Suspicious traffic is refused but logged in full; it is the signal used to
//! tune the pattern tables. Attacks arrive in floods of near-identical
//! probes, so they are refused quietly. Bots are served normally.

use std::collections::HashMap;

use crate::classify::{self, Verdict};

pub fn should_block(verdict: Verdict) -> bool {
    matches!(verdict, Verdict::Attack | Verdict::Suspicious)
}

pub fn should_reduce_logging(verdict: Verdict) -> bool {
    matches!(verdict, Verdict::Bot | Verdict::Attack)
}

/// Policy row for one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub block: bool,
    pub reduce_logging: bool,
}

impl AdmissionDecision {
    pub fn for_verdict(verdict: Verdict) -> Self {
        Self {
            block: should_block(verdict),
            reduce_logging: should_reduce_logging(verdict),
        }
    }
}

/// What the request was classified on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The route names a user: username and user-agent were both checked and
    /// the decision is enforced.
    Username,
    /// No user in the route (home page, health). Only the user-agent was
    /// checked, for log volume; nothing is blocked.
    UserAgentOnly,
    /// No route matched. The first path segment stood in for the username;
    /// the verdict only sets log volume and the answer is a 404 regardless.
    Unrouted,
}

/// The classification attached to each request's extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub decision: AdmissionDecision,
    pub scope: Scope,
}

impl Classification {
    /// Full classification of a request that targets `username`.
    pub fn for_username(username: &str, user_agent: &str, path: &str) -> Self {
        Self::new(classify::classify(username, user_agent, path), Scope::Username)
    }

    pub fn for_user_agent(user_agent: &str) -> Self {
        Self::new(classify::classify_user_agent(user_agent), Scope::UserAgentOnly)
    }

    /// Classifies a routed request from its path parameters.
    pub fn for_route(params: &HashMap<String, String>, user_agent: &str, path: &str) -> Self {
        match params.get("username") {
            Some(username) => Self::for_username(username, user_agent, path),
            None => Self::for_user_agent(user_agent),
        }
    }

    /// Classifies a path no route matched, treating its first segment as the
    /// username. The response is a 404 either way; this only sets log volume.
    pub fn for_unrouted(path: &str, user_agent: &str) -> Self {
        let first = path.trim_start_matches('/').split('/').next().unwrap_or("");
        Self::new(classify::classify(first, user_agent, path), Scope::Unrouted)
    }

    fn new(verdict: Verdict, scope: Scope) -> Self {
        Self { verdict, decision: AdmissionDecision::for_verdict(verdict), scope }
    }

    pub fn admission(&self) -> Admission {
        if self.scope == Scope::Username && self.decision.block {
            Admission::Block
        } else {
            Admission::Continue
        }
    }
}

/// Block/continue signal for the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Continue,
    /// Answer with the uniform 404 and stop. No handler, no upstream call.
    Block,
}

impl Admission {
    pub fn is_blocked(self) -> bool {
        self == Self::Block
    }
}
