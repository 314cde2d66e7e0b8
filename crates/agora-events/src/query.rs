//! Event query filters.

use serde::{Deserialize, Serialize};

use agora_types::{AgentName, Event, EventKind};

/// Largest tail limit a query may request.
pub const MAX_LIMIT: usize = 500;

/// Tail limit applied when a query does not set one.
pub const DEFAULT_LIMIT: usize = 50;

/// Filter and tail limit for reading a society's log.
///
/// All set filters must match. `viewer` applies message privacy: a
/// message is visible only to its sender and recipient, everything else is
/// visible to everyone. `participant` instead keeps only events in which
/// the agent is the actor, sender, or recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    /// Keep only events of this kind.
    pub kind: Option<EventKind>,
    /// Keep only events involving this agent.
    pub participant: Option<AgentName>,
    /// Hide messages this agent is not party to.
    pub viewer: Option<AgentName>,
    /// Return at most this many of the most recent matches.
    pub limit: Option<usize>,
}

impl EventQuery {
    /// A query matching everything, with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one event kind.
    #[must_use]
    pub fn of_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to events involving `agent`.
    #[must_use]
    pub fn involving(mut self, agent: AgentName) -> Self {
        self.participant = Some(agent);
        self
    }

    /// Apply message privacy for `agent`.
    #[must_use]
    pub fn for_agent(mut self, agent: AgentName) -> Self {
        self.viewer = Some(agent);
        self
    }

    /// Set the tail limit.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The tail limit to apply: the requested one capped at [`MAX_LIMIT`],
    /// or [`DEFAULT_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT))
    }

    /// Whether `event` passes every set filter.
    pub fn matches(&self, event: &Event) -> bool {
        self.kind.is_none_or(|k| event.kind() == k)
            && self.participant.as_ref().is_none_or(|a| event.involves(a))
            && self.viewer.as_ref().is_none_or(|v| event.visible_to(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(EventQuery::new().effective_limit(), DEFAULT_LIMIT);
        assert_eq!(EventQuery::new().limit(7).effective_limit(), 7);
        assert_eq!(EventQuery::new().limit(10_000).effective_limit(), MAX_LIMIT);
    }
}
