//! Core entity structs for the Agora simulation.
//!
//! Covers societies and agents, the event tagged union, the economic impact
//! record attached to decisions, and the derived read models (evolution
//! score, digest, economy snapshot) served to the presentation layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventKind, EvolutionTier, Genre, Judgment};
use crate::ids::{AgentName, DigestId, EventId, SocietyId};

// ---------------------------------------------------------------------------
// Society
// ---------------------------------------------------------------------------

/// Newspaper identity of a society, used by the digest generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PressProfile {
    /// Name of the paper (e.g. "Roma Gazette").
    pub title: String,
    /// Masthead line printed above the articles.
    pub masthead: String,
    /// Bylines that articles are attributed to.
    pub reporters: Vec<String>,
}

/// An independent simulated world.
///
/// Immutable after creation. Prosperity and the event log are owned by the
/// economy ledger and the society's log respectively, not by this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Society {
    /// Slug identifier.
    pub id: SocietyId,
    /// Display name.
    pub name: String,
    /// Setting genre.
    pub genre: Genre,
    /// Era or period label.
    pub era: String,
    /// Short description of the setting.
    pub description: String,
    /// Ruleset text shown to participants.
    pub rules: String,
    /// Fixed catalog of role names an agent may hold.
    pub roles: Vec<String>,
    /// Digest identity.
    pub press: PressProfile,
}

impl Society {
    /// Whether `role` belongs to this society's catalog.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A participant, human or scripted.
///
/// The monetary balance lives in the economy ledger; [`AgentProfile`]
/// combines both for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Agent {
    /// Unique, case-sensitive name.
    pub name: AgentName,
    /// Personality descriptor (free text).
    pub personality: String,
    /// Self-description supplied at registration.
    pub description: String,
    /// Societies joined, in join order.
    pub societies: Vec<SocietyId>,
    /// Role held in each joined society. Assigned once, never changed.
    pub roles: BTreeMap<SocietyId, String>,
    /// When the agent registered.
    pub registered_at: DateTime<Utc>,
    /// Last time the agent performed a mutating action.
    pub last_active: DateTime<Utc>,
}

impl Agent {
    /// Create a freshly registered agent with no memberships.
    pub const fn new(
        name: AgentName,
        personality: String,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            personality,
            description,
            societies: Vec::new(),
            roles: BTreeMap::new(),
            registered_at: now,
            last_active: now,
        }
    }

    /// The role held in `society`, if the agent is a member.
    pub fn role_in(&self, society: &SocietyId) -> Option<&str> {
        self.roles.get(society).map(String::as_str)
    }
}

/// Agent record plus current balance, as served to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentProfile {
    /// The directory record.
    #[serde(flatten)]
    pub agent: Agent,
    /// Current balance.
    #[ts(as = "String")]
    pub balance: Decimal,
}

// ---------------------------------------------------------------------------
// Economic impact
// ---------------------------------------------------------------------------

/// Integer projection of an [`EconomicImpact`] for display.
///
/// Values are rounded half toward positive infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactDisplay {
    /// Rounded balance change.
    pub balance_change: i64,
    /// Rounded balance after the change.
    pub new_balance: i64,
    /// Rounded prosperity change.
    pub prosperity_change: i64,
    /// Rounded prosperity after the change.
    pub new_prosperity: i64,
}

/// Economic consequences of one resolved decision.
///
/// Deltas are the rule-derived amounts before clamping; the resulting
/// balance is clamped at zero and the resulting prosperity to 0-100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EconomicImpact {
    /// Acting agent.
    pub agent: AgentName,
    /// Society whose prosperity moved.
    pub society: SocietyId,
    /// Keyword of the rule that matched the action label.
    pub rule: String,
    /// Signed balance delta.
    #[ts(as = "String")]
    pub balance_delta: Decimal,
    /// Balance after the delta, clamped at zero.
    #[ts(as = "String")]
    pub balance: Decimal,
    /// Signed prosperity delta.
    #[ts(as = "String")]
    pub prosperity_delta: Decimal,
    /// Prosperity after the delta, clamped to 0-100.
    #[ts(as = "String")]
    pub prosperity: Decimal,
    /// Rounded values for display.
    pub display: ImpactDisplay,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Details of a resolved decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DecisionDetails {
    /// Proposing agent.
    pub agent: AgentName,
    /// Action label (matched against the economy rule table).
    pub action: String,
    /// Optional target of the action.
    pub target: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Die face, 1-6.
    pub dice_roll: u8,
    /// Whether the society accepted the decision.
    pub accepted: bool,
    /// Judgment band of the die face.
    pub judgment: Judgment,
    /// Human-readable verdict.
    pub verdict: String,
    /// Economic consequences, when the ledger was applied.
    pub economy: Option<EconomicImpact>,
}

/// Details of a private message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MessageDetails {
    /// Sender.
    pub from: AgentName,
    /// Recipient.
    pub to: AgentName,
    /// Message body.
    pub content: String,
}

/// Details of an agent joining a society.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JoinDetails {
    /// Joining agent.
    pub agent: AgentName,
    /// Role assigned on join.
    pub role: String,
}

/// Type-specific part of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventPayload {
    /// A resolved decision.
    Decision(DecisionDetails),
    /// A private message.
    Message(MessageDetails),
    /// A membership join.
    Join(JoinDetails),
}

impl EventPayload {
    /// The discriminant of this payload.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Decision(_) => EventKind::Decision,
            Self::Message(_) => EventKind::Message,
            Self::Join(_) => EventKind::Join,
        }
    }
}

/// An immutable entry in a society's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique event id.
    pub id: EventId,
    /// Owning society.
    pub society: SocietyId,
    /// Position in the society's log (0-based, never reused).
    pub seq: u64,
    /// Append time; strictly increasing within a society.
    pub timestamp: DateTime<Utc>,
    /// Type-specific fields.
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    /// The discriminant of this event.
    pub const fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Whether `agent` is the actor, sender, or recipient of this event.
    pub fn involves(&self, agent: &AgentName) -> bool {
        match &self.payload {
            EventPayload::Decision(d) => &d.agent == agent,
            EventPayload::Message(m) => &m.from == agent || &m.to == agent,
            EventPayload::Join(j) => &j.agent == agent,
        }
    }

    /// Whether `viewer` may see this event.
    ///
    /// Messages are private to their sender and recipient; every other
    /// event is public.
    pub fn visible_to(&self, viewer: &AgentName) -> bool {
        match &self.payload {
            EventPayload::Message(m) => &m.from == viewer || &m.to == viewer,
            EventPayload::Decision(_) | EventPayload::Join(_) => true,
        }
    }

    /// The decision details, if this is a decision event.
    pub const fn as_decision(&self) -> Option<&DecisionDetails> {
        match &self.payload {
            EventPayload::Decision(d) => Some(d),
            EventPayload::Message(_) | EventPayload::Join(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived read models
// ---------------------------------------------------------------------------

/// Per-factor contributions to an evolution score, before the final clamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EvolutionFactors {
    /// Contribution of elapsed time since the epoch.
    #[ts(as = "String")]
    pub time: Decimal,
    /// Contribution of event volume.
    #[ts(as = "String")]
    pub event_volume: Decimal,
    /// Contribution of current prosperity.
    #[ts(as = "String")]
    pub prosperity: Decimal,
    /// Contribution of the decision acceptance rate (signed).
    #[ts(as = "String")]
    pub acceptance: Decimal,
}

/// A society's derived 0-100 developmental score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EvolutionScore {
    /// Scored society.
    pub society: SocietyId,
    /// Rounded, clamped score.
    pub score: u8,
    /// Qualitative tier of the score.
    pub tier: EvolutionTier,
    /// Display label of the tier.
    pub label: String,
    /// Factor breakdown.
    pub factors: EvolutionFactors,
    /// Acceptance rate of the decisions considered, 0-1.
    #[ts(as = "String")]
    pub acceptance_rate: Decimal,
}

/// One article of a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Article {
    /// Headline.
    pub headline: String,
    /// Body text.
    pub body: String,
    /// Byline.
    pub reporter: String,
    /// Timestamp of the underlying event.
    pub timestamp: DateTime<Utc>,
    /// Underlying event.
    pub event_id: EventId,
}

/// Editorial comment closing a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Editorial {
    /// Section title.
    pub title: String,
    /// Comment text.
    pub content: String,
    /// Acceptance rate of the decisions covered, in percent.
    pub acceptance_rate: u8,
}

/// A human-readable summary of a society's recent events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Digest {
    /// Digest id.
    pub id: DigestId,
    /// Covered society.
    pub society: SocietyId,
    /// Paper title.
    pub title: String,
    /// Masthead line.
    pub masthead: String,
    /// Issue date (`YYYY-MM-DD`).
    pub date: String,
    /// Articles, oldest first.
    pub articles: Vec<Article>,
    /// Editorial comment.
    pub editorial: Editorial,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

/// Balances and prosperity across the whole simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EconomySnapshot {
    /// Balance per agent.
    #[ts(as = "BTreeMap<AgentName, String>")]
    pub balances: BTreeMap<AgentName, Decimal>,
    /// Prosperity per society.
    #[ts(as = "BTreeMap<SocietyId, String>")]
    pub prosperity: BTreeMap<SocietyId, Decimal>,
}

/// A society with its live aggregates, as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SocietySummary {
    /// The society record.
    #[serde(flatten)]
    pub society: Society,
    /// Current prosperity.
    #[ts(as = "String")]
    pub prosperity: Decimal,
    /// Number of member agents.
    pub members: usize,
    /// Events ever appended to the society's log.
    pub event_count: u64,
}

/// Simulation-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Number of societies.
    pub societies: usize,
    /// Number of registered agents.
    pub agents: usize,
    /// Events ever appended, across all societies.
    pub total_events: u64,
}
