//! Enumeration types for the Agora simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Discriminant of an [`EventPayload`](crate::structs::EventPayload), used
/// for filtering without matching on the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// A resolved decision.
    Decision,
    /// A private message between two agents.
    Message,
    /// An agent joining a society.
    Join,
}

impl EventKind {
    /// The wire name of the kind (`decision`, `message`, `join`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Message => "message",
            Self::Join => "join",
        }
    }
}

impl core::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(Self::Decision),
            "message" => Ok(Self::Message),
            "join" => Ok(Self::Join),
            other => Err(format!("unknown event type `{other}`")),
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Judgment bands
// ---------------------------------------------------------------------------

/// The society's reaction to a decision, derived from a six-sided die.
///
/// | Die | Judgment | Accepted |
/// |-----|----------|----------|
/// | 1-2 | [`StrongRejection`](Self::StrongRejection) | no |
/// | 3 | [`Reserved`](Self::Reserved) | no |
/// | 4 | [`GrudgingAcceptance`](Self::GrudgingAcceptance) | yes |
/// | 5-6 | [`EnthusiasticAcceptance`](Self::EnthusiasticAcceptance) | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Judgment {
    /// The society firmly opposes the proposal.
    StrongRejection,
    /// The society holds back and does not adopt the proposal.
    Reserved,
    /// The society accepts, reluctantly.
    GrudgingAcceptance,
    /// The society embraces the proposal.
    EnthusiasticAcceptance,
}

impl Judgment {
    /// Map a die face onto its judgment band.
    ///
    /// Faces below 1 fall into the lowest band and faces above 6 into the
    /// highest, so the function is total over `u8`.
    pub const fn from_dice(dice: u8) -> Self {
        match dice {
            0..=2 => Self::StrongRejection,
            3 => Self::Reserved,
            4 => Self::GrudgingAcceptance,
            _ => Self::EnthusiasticAcceptance,
        }
    }

    /// Whether this judgment accepts the decision.
    pub const fn accepted(self) -> bool {
        matches!(self, Self::GrudgingAcceptance | Self::EnthusiasticAcceptance)
    }

    /// Human-readable verdict attached to the decision event.
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::StrongRejection => {
                "Strong rejection: the society stands firmly against this proposal."
            }
            Self::Reserved => "Reserved: the society hesitates and sets the proposal aside.",
            Self::GrudgingAcceptance => {
                "Grudging acceptance: the society goes along, without enthusiasm."
            }
            Self::EnthusiasticAcceptance => {
                "Enthusiastic acceptance: the society embraces the proposal."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evolution tiers
// ---------------------------------------------------------------------------

/// Qualitative stage of a society's development, derived from its
/// evolution score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EvolutionTier {
    /// Score below 20.
    VergeOfCollapse,
    /// Score 20 to 39.
    Struggling,
    /// Score 40 to 59.
    SteadyProgress,
    /// Score 60 to 79.
    Flourishing,
    /// Score 80 and above.
    Zenith,
}

impl EvolutionTier {
    /// Map a 0-100 score onto its tier.
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Zenith,
            60..=79 => Self::Flourishing,
            40..=59 => Self::SteadyProgress,
            20..=39 => Self::Struggling,
            _ => Self::VergeOfCollapse,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::VergeOfCollapse => "On the verge of collapse",
            Self::Struggling => "Struggling to survive",
            Self::SteadyProgress => "Steady progress",
            Self::Flourishing => "Flourishing",
            Self::Zenith => "Civilization at its zenith",
        }
    }
}

// ---------------------------------------------------------------------------
// Society genre
// ---------------------------------------------------------------------------

/// Broad setting of a society, used by dashboards for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum Genre {
    /// A historical setting.
    Historical,
    /// A science-fiction setting.
    SciFi,
}
